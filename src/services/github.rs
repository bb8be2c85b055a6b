use std::env;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::error::app_error::AppResult;
use crate::services::censor::get_env;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ATTEMPTS: u32 = 3;
const USER_AGENT: &str = "blog-backend";

/// Profile returned by the provider. The public email may be absent, in
/// which case the account email listing is consulted.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubProfile {
    pub login: String,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubEmail {
    pub email: String,
    pub primary: bool,
    pub verified: bool,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// GitHub OAuth client. Every upstream call is attempted up to three times
/// with a 1s then 2s pause between attempts; the login usecase wraps the
/// whole flow in an overall deadline.
#[derive(Clone)]
pub struct GithubOAuth {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    authorize_url: String,
    token_url: String,
    api_base: String,
}

impl GithubOAuth {
    pub fn from_env() -> Result<Self, String> {
        let client_id = get_env("GITHUB_CLIENT_ID")?;
        let client_secret = get_env("GITHUB_CLIENT_SECRET")?;
        let redirect_url = env::var("GITHUB_REDIRECT_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api/auth/github/callback".to_string());
        let authorize_url = env::var("GITHUB_AUTHORIZE_URL")
            .unwrap_or_else(|_| "https://github.com/login/oauth/authorize".to_string());
        let token_url = env::var("GITHUB_TOKEN_URL")
            .unwrap_or_else(|_| "https://github.com/login/oauth/access_token".to_string());
        let api_base =
            env::var("GITHUB_API_BASE").unwrap_or_else(|_| "https://api.github.com".to_string());
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| format!("GitHub HTTP client error: {}", e))?;

        Ok(Self {
            http,
            client_id,
            client_secret,
            redirect_url,
            authorize_url,
            token_url,
            api_base,
        })
    }

    /// Provider authorization URL; the caller's return URL travels in `state`.
    pub fn authorize_url(&self, return_url: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope=user:email&state={}",
            self.authorize_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_url),
            urlencoding::encode(return_url)
        )
    }

    pub async fn exchange_code(&self, code: &str) -> AppResult<String> {
        with_backoff("GitHub token exchange", || async move {
            let response = self
                .http
                .post(&self.token_url)
                .header(reqwest::header::ACCEPT, "application/json")
                .form(&[
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                    ("code", code),
                    ("redirect_uri", self.redirect_url.as_str()),
                ])
                .send()
                .await
                .map_err(|e| AppError::ExternalService(format!("Token exchange failed: {}", e)))?;
            if !response.status().is_success() {
                return Err(AppError::ExternalService(format!(
                    "Token endpoint returned status {}",
                    response.status()
                )));
            }
            let body: TokenResponse = response.json().await.map_err(|e| {
                AppError::ExternalService(format!("Token response invalid: {}", e))
            })?;
            body.access_token
                .filter(|value| !value.is_empty())
                .ok_or_else(|| {
                    AppError::ExternalService("Token response missing access_token".to_string())
                })
        })
        .await
    }

    pub async fn fetch_profile(&self, access_token: &str) -> AppResult<GithubProfile> {
        let url = format!("{}/user", self.api_base);
        with_backoff("GitHub profile fetch", || {
            let url = url.clone();
            async move { self.get_json::<GithubProfile>(&url, access_token).await }
        })
        .await
    }

    /// Lists the account's email addresses and picks the first one marked
    /// both primary and verified.
    pub async fn fetch_primary_email(&self, access_token: &str) -> AppResult<Option<String>> {
        let url = format!("{}/user/emails", self.api_base);
        let emails = with_backoff("GitHub email fetch", || {
            let url = url.clone();
            async move { self.get_json::<Vec<GithubEmail>>(&url, access_token).await }
        })
        .await?;
        Ok(pick_primary_verified(&emails))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
    ) -> AppResult<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("GitHub request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "GitHub API returned status {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("GitHub response invalid: {}", e)))
    }
}

fn pick_primary_verified(emails: &[GithubEmail]) -> Option<String> {
    emails
        .iter()
        .find(|entry| entry.primary && entry.verified)
        .map(|entry| entry.email.clone())
}

/// Runs `op` up to three times, pausing 1s after the first failure and 2s
/// after the second. The last error is returned once attempts are exhausted.
pub(crate) async fn with_backoff<T, F, Fut>(op_name: &str, mut op: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = AppResult<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_ATTEMPTS => {
                warn!(attempt, error = %err, "{} failed, retrying", op_name);
                tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
                attempt += 1;
            }
            Err(err) => {
                warn!(error = %err, "{} failed after {} attempts", op_name, MAX_ATTEMPTS);
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn email(address: &str, primary: bool, verified: bool) -> GithubEmail {
        GithubEmail {
            email: address.to_string(),
            primary,
            verified,
        }
    }

    #[test]
    fn picks_first_primary_and_verified_email() {
        let emails = vec![
            email("old@example.com", false, true),
            email("unverified@example.com", true, false),
            email("main@example.com", true, true),
            email("second@example.com", true, true),
        ];
        assert_eq!(
            pick_primary_verified(&emails).as_deref(),
            Some("main@example.com")
        );
    }

    #[test]
    fn no_suitable_email_yields_none() {
        let emails = vec![email("old@example.com", false, false)];
        assert_eq!(pick_primary_verified(&emails), None);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_succeeds_on_later_attempt() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = with_backoff("test op", || async move {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt < 3 {
                Err(AppError::ExternalService("boom".to_string()))
            } else {
                Ok(attempt)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_gives_up_after_three_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = tokio::time::Instant::now();
        let result: AppResult<()> = with_backoff("test op", || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(AppError::ExternalService("boom".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s after the first failure, 2s after the second.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }
}
