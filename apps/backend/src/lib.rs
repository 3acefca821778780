//! Quizdeck backend API server

pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use db::Database;
use services::{GoogleTokenVerifier, JwtService, TokenInfoVerifier};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub google: Arc<dyn GoogleTokenVerifier>,
    pub jwt: Arc<JwtService>,
}

/// Run the backend server
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizdeck_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let jwt_secret = std::env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
    let google_client_id = std::env::var("GOOGLE_CLIENT_ID")
        .map_err(|_| anyhow::anyhow!("GOOGLE_CLIENT_ID must be set"))?;

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());

    tracing::info!("Connecting to database");
    let db = Database::connect(&database_url).await?;

    tracing::info!("Running migrations");
    db.run_migrations().await?;

    let state = AppState {
        db: Arc::new(db),
        google: Arc::new(TokenInfoVerifier::new(google_client_id)),
        jwt: Arc::new(JwtService::new(&jwt_secret)),
    };

    let app = routes::create_router(state);

    let addr = format!("{host}:{port}");
    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
