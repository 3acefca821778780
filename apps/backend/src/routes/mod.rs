//! HTTP route handlers

pub mod admin;
pub mod auth;
pub mod contact;
pub mod courses;
pub mod payments;
pub mod users;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/subjects", post(admin::create_subject))
        .route("/subjects/{id}", put(admin::update_subject))
        .route("/subjects/{id}/toggle", patch(admin::toggle_subject))
        .route("/modules", post(admin::create_module))
        .route("/modules/{id}/toggle", patch(admin::toggle_module))
        .route("/sub-modules", post(admin::create_submodule))
        .route("/sub-modules/{id}/toggle", patch(admin::toggle_submodule))
        .route("/questions", post(admin::create_question))
        .route("/questions/{id}", put(admin::update_question))
        .route(
            "/submodules/{submodule_id}",
            get(admin::submodule_with_questions),
        )
        .route("/submodules/upload", post(admin::upload_submodule))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let user_routes = Router::new()
        .route("/submodules/{id}", get(users::submodule_questions))
        .route("/questions/{id}/attempt", post(users::record_attempt))
        .route("/questions/{id}/note", put(users::set_note))
        .route("/questions/{id}/tag", put(users::set_tag))
        .route("/submit-analytics", post(users::submit_analytics))
        .route("/analytics", get(users::analytics))
        .route("/attempted-submodule", get(users::attempted_submodules))
        .route("/reset-quiz", post(users::reset_quiz));

    Router::new()
        .route("/health", get(health))
        .route("/api/dashboard", get(courses::dashboard))
        .route("/api/courses/{subject_name}", get(courses::course_detail))
        .route(
            "/api/courses/{subject_name}/{submodule_id}",
            get(courses::submodule_questions),
        )
        .route(
            "/api/modules/submodules/{module_id}",
            get(courses::module_submodules),
        )
        .nest("/api/admin", admin_routes)
        .nest("/api/users", user_routes)
        .route("/api/auth/google", post(auth::google_login))
        .route("/api/payment/process-payment", post(payments::process_payment))
        .route("/api/contact", post(contact::submit_message))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}
