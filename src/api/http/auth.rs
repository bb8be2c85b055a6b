use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    app::state::AppState,
    auth::middleware::MaybeSession,
    dto::auth::{
        GithubCallbackQuery, GithubLoginQuery, LoginRequest, LoginResponse, LogoutResponse,
        SessionResponse, UpdateProfileRequest, UserResponse,
    },
    error::AppError,
    usecases::auth::AuthService,
};

pub const SESSION_COOKIE: &str = "auth_token";

pub async fn login_handle(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, &state.jwt_config, req).await?;
    Ok(Json(response))
}

pub async fn logout_handle(State(state): State<AppState>) -> Result<Response, AppError> {
    let cookie = clear_session_cookie(state.cookie_domain.as_deref());
    let header_value = HeaderValue::from_str(&cookie)
        .map_err(|_| AppError::Internal("Invalid cookie value".to_string()))?;

    let mut response = Json(LogoutResponse {
        message: "Logged out".to_string(),
    })
    .into_response();
    response.headers_mut().append(header::SET_COOKIE, header_value);
    Ok(response)
}

/// Profile of the current session, read from the verified token claims.
pub async fn get_me_handle(
    Extension(MaybeSession(session)): Extension<MaybeSession>,
) -> Result<Json<SessionResponse>, AppError> {
    let session =
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    Ok(Json(SessionResponse {
        username: session.username,
        email: session.email,
        avatar: session.avatar,
    }))
}

pub async fn update_me_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let session =
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
    let response = AuthService::update_profile(&state.db, &session, req).await?;
    Ok(Json(response))
}

/// Sends the browser to the provider's consent page; the caller's return
/// URL rides along in `state`.
pub async fn github_login_handle(
    State(state): State<AppState>,
    Query(query): Query<GithubLoginQuery>,
) -> Result<Redirect, AppError> {
    let github = state.github.as_ref().ok_or_else(|| {
        AppError::ExternalService("GitHub OAuth is not configured".to_string())
    })?;
    let return_url = query
        .return_url
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| state.frontend_url.clone());
    let encoded = urlencoding::encode(&return_url).into_owned();

    Ok(Redirect::temporary(&github.authorize_url(&encoded)))
}

pub async fn github_callback_handle(
    State(state): State<AppState>,
    Query(query): Query<GithubCallbackQuery>,
) -> Result<Response, AppError> {
    let code = query
        .code
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let outcome =
        AuthService::complete_github_login(&state, &code, query.state.as_deref()).await?;

    let max_age = state.jwt_config.expiration_hours * 3600;
    let cookie = session_cookie(&outcome.token, state.cookie_domain.as_deref(), max_age);
    let header_value = HeaderValue::from_str(&cookie)
        .map_err(|_| AppError::Internal("Invalid cookie value".to_string()))?;

    let mut response = Redirect::temporary(&outcome.redirect_to).into_response();
    response.headers_mut().append(header::SET_COOKIE, header_value);
    Ok(response)
}

/// Cross-site cookie shared with the frontend, scoped to the deployment's
/// parent domain when one is configured.
fn session_cookie(token: &str, domain: Option<&str>, max_age_secs: i64) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; Secure; HttpOnly; SameSite=None",
        SESSION_COOKIE, token, max_age_secs
    );
    if let Some(domain) = domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    cookie
}

fn clear_session_cookie(domain: Option<&str>) -> String {
    session_cookie("", domain, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_carries_flags_and_domain() {
        let cookie = session_cookie("tok123", Some(".blog.example"), 604800);
        assert_eq!(
            cookie,
            "auth_token=tok123; Path=/; Max-Age=604800; Secure; HttpOnly; SameSite=None; Domain=.blog.example"
        );
    }

    #[test]
    fn session_cookie_without_domain() {
        let cookie = session_cookie("tok123", None, 60);
        assert!(!cookie.contains("Domain="));
    }

    #[test]
    fn clearing_expires_the_cookie() {
        let cookie = clear_session_cookie(None);
        assert!(cookie.starts_with("auth_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
