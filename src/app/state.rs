use sqlx::PgPool;
use tracing::warn;

use crate::{
    auth::jwt::JwtConfig,
    services::{censor::CensorService, github::GithubOAuth},
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub censor: Option<CensorService>,
    pub github: Option<GithubOAuth>,
    pub frontend_url: String,
    pub cookie_domain: Option<String>,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "change-me-in-production".to_string());
        let jwt_config = JwtConfig::from_env(jwt_secret);

        // Both external services are optional: without moderation the engine
        // fail-closes, without OAuth the login routes answer 502.
        let censor = match CensorService::from_env() {
            Ok(service) => Some(service),
            Err(message) => {
                warn!("Content moderation not configured: {}", message);
                None
            }
        };
        let github = match GithubOAuth::from_env() {
            Ok(service) => Some(service),
            Err(message) => {
                warn!("GitHub OAuth not configured: {}", message);
                None
            }
        };

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let cookie_domain = std::env::var("COOKIE_DOMAIN")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Self {
            db,
            jwt_config,
            censor,
            github,
            frontend_url,
            cookie_domain,
        }
    }
}
