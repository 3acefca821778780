//! Google ID token verification

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Profile fields extracted from a verified Google ID token
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Verifies Google-issued ID tokens. Swapped for a stub in tests.
#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<GoogleProfile>;
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// Verifier backed by Google's tokeninfo endpoint
pub struct TokenInfoVerifier {
    client: reqwest::Client,
    client_id: String,
}

impl TokenInfoVerifier {
    pub fn new(client_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
        }
    }
}

#[async_trait]
impl GoogleTokenVerifier for TokenInfoVerifier {
    async fn verify(&self, token: &str) -> Result<GoogleProfile> {
        let response = self
            .client
            .get("https://oauth2.googleapis.com/tokeninfo")
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| ApiError::Internal(format!("tokeninfo request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::Unauthorized("invalid Google token".to_string()));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| ApiError::Internal(format!("tokeninfo response malformed: {e}")))?;

        if info.aud != self.client_id {
            return Err(ApiError::Unauthorized(
                "token issued for another client".to_string(),
            ));
        }

        Ok(GoogleProfile {
            sub: info.sub,
            email: info.email,
            name: info.name,
            picture: info.picture,
        })
    }
}
