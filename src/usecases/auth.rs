use std::time::Duration;

use sqlx::PgPool;

use crate::{
    app::state::AppState,
    auth::{
        jwt::{JwtConfig, hash_password, verify_password},
        middleware::Session,
    },
    dto::auth::{LoginRequest, LoginResponse, UpdateProfileRequest, UserResponse},
    error::AppError,
    repositories::users as user_repo,
    repositories::users::UpdateProfileParams,
    services::github::GithubOAuth,
    telemetry::{BusinessEvent, redact_email},
};

/// Upper bound on the whole OAuth callback, covering every retried upstream
/// call.
const OAUTH_FLOW_DEADLINE: Duration = Duration::from_secs(30);

pub struct AuthService;

#[derive(Debug)]
pub struct GithubLoginOutcome {
    pub token: String,
    pub redirect_to: String,
}

#[derive(Debug)]
struct GithubIdentity {
    username: String,
    email: Option<String>,
    avatar: Option<String>,
}

impl AuthService {
    pub async fn login(
        pool: &PgPool,
        jwt_config: &JwtConfig,
        req: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let email = req.email.trim();
        let user = match user_repo::find_user_by_email(pool, email).await? {
            Some(user) => user,
            None => {
                BusinessEvent::LoginFailed {
                    email_redacted: redact_email(email),
                    reason: "user_not_found".to_string(),
                }
                .log();
                return Err(AppError::InvalidCredentials(
                    "Invalid email or password".to_string(),
                ));
            }
        };

        let valid = verify_password(&req.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            BusinessEvent::LoginFailed {
                email_redacted: redact_email(email),
                reason: "bad_password".to_string(),
            }
            .log();
            return Err(AppError::InvalidCredentials(
                "Invalid email or password".to_string(),
            ));
        }

        let token = jwt_config
            .create_session_token(&user.username, &user.email, user.avatar.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        BusinessEvent::UserLoggedIn { user_id: user.id }.log();

        Ok(LoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    pub async fn update_profile(
        pool: &PgPool,
        session: &Session,
        req: UpdateProfileRequest,
    ) -> Result<UserResponse, AppError> {
        let user = user_repo::find_user_by_username(pool, &session.username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut params = UpdateProfileParams::default();

        if let Some(username) = normalize(req.username) {
            if username != user.username {
                if user_repo::username_taken_by_other(pool, &username, user.id).await? {
                    return Err(AppError::BadRequest("Username already taken".to_string()));
                }
                params.username = Some(username);
            }
        }
        params.avatar = normalize(req.avatar);
        params.nickname = normalize(req.nickname);
        params.bio = normalize(req.bio);

        if let (Some(current), Some(new)) = (
            normalize(req.current_password),
            normalize(req.new_password),
        ) {
            let valid = verify_password(&current, &user.password_hash)
                .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
            if !valid {
                return Err(AppError::BadRequest(
                    "Current password is incorrect".to_string(),
                ));
            }
            let hashed = hash_password(&new)
                .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
            params.password_hash = Some(hashed);
        }

        let updated = user_repo::update_profile(pool, user.id, params)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserResponse::from(updated))
    }

    /// Exchanges the callback code for an identity and mints the session
    /// cookie value. The flow is bounded by an overall deadline on top of
    /// the per-call retry policy.
    pub async fn complete_github_login(
        state: &AppState,
        code: &str,
        oauth_state: Option<&str>,
    ) -> Result<GithubLoginOutcome, AppError> {
        let github = state.github.as_ref().ok_or_else(|| {
            AppError::ExternalService("GitHub OAuth is not configured".to_string())
        })?;

        let identity = tokio::time::timeout(OAUTH_FLOW_DEADLINE, github_identity(github, code))
            .await
            .map_err(|_| AppError::ExternalService("GitHub login timed out".to_string()))??;

        let token = state
            .jwt_config
            .create_session_token(
                &identity.username,
                identity.email.as_deref().unwrap_or_default(),
                identity.avatar,
            )
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        BusinessEvent::OAuthLoginCompleted {
            username: identity.username,
        }
        .log();

        Ok(GithubLoginOutcome {
            token,
            redirect_to: resolve_return_url(oauth_state, &state.frontend_url),
        })
    }
}

async fn github_identity(github: &GithubOAuth, code: &str) -> Result<GithubIdentity, AppError> {
    let access_token = github.exchange_code(code).await?;
    let profile = github.fetch_profile(&access_token).await?;
    let email = match profile.email.filter(|email| !email.is_empty()) {
        Some(email) => Some(email),
        None => github.fetch_primary_email(&access_token).await?,
    };

    Ok(GithubIdentity {
        username: profile.login,
        email,
        avatar: profile.avatar_url,
    })
}

/// The authorize redirect carried the caller's return URL in `state`,
/// percent-encoded; fall back to the frontend root when absent or mangled.
fn resolve_return_url(state_param: Option<&str>, fallback: &str) -> String {
    state_param
        .filter(|value| !value.is_empty())
        .and_then(|value| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .unwrap_or_else(|| fallback.to_string())
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_url_is_decoded_from_state() {
        let state = "https%3A%2F%2Fblog.example%2Fposts%2F42";
        assert_eq!(
            resolve_return_url(Some(state), "https://blog.example/"),
            "https://blog.example/posts/42"
        );
    }

    #[test]
    fn missing_or_empty_state_falls_back() {
        assert_eq!(
            resolve_return_url(None, "https://blog.example/"),
            "https://blog.example/"
        );
        assert_eq!(
            resolve_return_url(Some(""), "https://blog.example/"),
            "https://blog.example/"
        );
    }

    #[test]
    fn blank_profile_fields_normalize_to_none() {
        assert_eq!(normalize(Some("  ".to_string())), None);
        assert_eq!(normalize(Some(" neo ".to_string())).as_deref(), Some("neo"));
        assert_eq!(normalize(None), None);
    }
}
