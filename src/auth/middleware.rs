use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::{app::state::AppState, error::AppError};

/// Verified session identity, inserted into request extensions. OAuth-only
/// visitors carry a session without a matching row in core.user.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Inserted by the optional-auth layer on every request, holding a session
/// only when a valid token was presented.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

/// Rejects the request unless a valid session token is presented.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&req).ok_or(AppError::Unauthorized(
        "Missing authorization token".to_string(),
    ))?;

    let claims = state
        .jwt_config
        .verify_session_token(&token)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    req.extensions_mut().insert(Session {
        username: claims.username,
        email: claims.email,
        avatar: claims.avatar,
    });

    Ok(next.run(req).await)
}

/// Attaches the session when a valid token is presented and an empty
/// `MaybeSession` otherwise, so handlers can serve both anonymous and
/// registered callers.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let session = extract_token(&req)
        .and_then(|token| state.jwt_config.verify_session_token(&token).ok())
        .map(|claims| Session {
            username: claims.username,
            email: claims.email,
            avatar: claims.avatar,
        });
    req.extensions_mut().insert(MaybeSession(session));

    next.run(req).await
}

/// Token lookup order: Authorization header, then the session cookie set by
/// the OAuth callback, then a `token` query parameter.
fn extract_token(req: &Request) -> Option<String> {
    bearer_token(req.headers())
        .or_else(|| cookie_value(req.headers(), crate::api::http::auth::SESSION_COOKIE))
        .or_else(|| {
            let query = req.uri().query().unwrap_or("");
            let params: std::collections::HashMap<String, String> =
                serde_urlencoded::from_str(query).unwrap_or_default();
            params.get("token").cloned()
        })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn reads_bearer_token() {
        let headers = headers_with(header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn ignores_non_bearer_authorization() {
        let headers = headers_with(header::AUTHORIZATION, "Basic dXNlcg==");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn finds_cookie_among_several() {
        let headers = headers_with(header::COOKIE, "theme=dark; auth_token=tok123; lang=en");
        assert_eq!(
            cookie_value(&headers, "auth_token").as_deref(),
            Some("tok123")
        );
    }

    #[test]
    fn missing_cookie_yields_none() {
        let headers = headers_with(header::COOKIE, "theme=dark");
        assert_eq!(cookie_value(&headers, "auth_token"), None);
    }
}
