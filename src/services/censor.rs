use std::env;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::error::app_error::AppResult;
use crate::error::AppError;

const CENSOR_TIMEOUT: Duration = Duration::from_secs(5);
const TOKEN_TTL: Duration = Duration::from_secs(3600);
const COMPLIANT_CONCLUSION: &str = "合规";

/// Outcome of a text-safety check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Compliant,
    NonCompliant,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    fetched_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.is_fresh_at(Instant::now())
    }

    fn is_fresh_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < TOKEN_TTL
    }
}

/// Client for the Baidu text-censor API. Requests carry a short timeout so a
/// slow gateway never stalls comment creation; callers treat any error as an
/// unapproved verdict.
#[derive(Clone)]
pub struct CensorService {
    http: reqwest::Client,
    api_key: String,
    secret_key: String,
    token_url: String,
    censor_url: String,
    cached_token: Arc<Mutex<Option<CachedToken>>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct CensorResponse {
    conclusion: Option<String>,
}

impl CensorService {
    pub fn from_env() -> Result<Self, String> {
        let api_key = get_env("BAIDU_API_KEY")?;
        let secret_key = get_env("BAIDU_SECRET_KEY")?;
        let token_url = env::var("CENSOR_TOKEN_URL")
            .unwrap_or_else(|_| "https://aip.baidubce.com/oauth/2.0/token".to_string());
        let censor_url = env::var("CENSOR_API_URL").unwrap_or_else(|_| {
            "https://aip.baidubce.com/rest/2.0/solution/v1/text_censor/v2/user_defined"
                .to_string()
        });
        let http = reqwest::Client::builder()
            .timeout(CENSOR_TIMEOUT)
            .build()
            .map_err(|e| format!("Censor HTTP client error: {}", e))?;

        Ok(Self {
            http,
            api_key,
            secret_key,
            token_url,
            censor_url,
            cached_token: Arc::new(Mutex::new(None)),
        })
    }

    /// Classifies free text. Transport and gateway errors surface as `Err`;
    /// the comment engine maps those onto a fail-closed approval.
    pub async fn censor(&self, text: &str) -> AppResult<Verdict> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(format!("{}?access_token={}", self.censor_url, token))
            .form(&[("text", text)])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Censor request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Censor returned status {}",
                response.status()
            )));
        }
        let body: CensorResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Censor response invalid: {}", e)))?;

        Ok(verdict_from_conclusion(body.conclusion.as_deref()))
    }

    async fn access_token(&self) -> AppResult<String> {
        if let Some(token) = self.fresh_cached_token() {
            return Ok(token);
        }

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.secret_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Censor token request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Censor token endpoint returned status {}",
                response.status()
            )));
        }
        let body: TokenResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Censor token response invalid: {}", e))
        })?;
        let token = body
            .access_token
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError::ExternalService("Censor token response missing access_token".to_string())
            })?;

        if let Ok(mut guard) = self.cached_token.lock() {
            *guard = Some(CachedToken {
                value: token.clone(),
                fetched_at: Instant::now(),
            });
        }

        Ok(token)
    }

    fn fresh_cached_token(&self) -> Option<String> {
        let guard = self.cached_token.lock().ok()?;
        guard
            .as_ref()
            .filter(|token| token.is_fresh())
            .map(|token| token.value.clone())
    }
}

fn verdict_from_conclusion(conclusion: Option<&str>) -> Verdict {
    match conclusion {
        Some(COMPLIANT_CONCLUSION) => Verdict::Compliant,
        _ => Verdict::NonCompliant,
    }
}

pub(crate) fn get_env(key: &str) -> Result<String, String> {
    env::var(key).map_err(|_| format!("Missing {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliant_conclusion_maps_to_compliant() {
        assert_eq!(
            verdict_from_conclusion(Some(COMPLIANT_CONCLUSION)),
            Verdict::Compliant
        );
    }

    #[test]
    fn any_other_conclusion_is_non_compliant() {
        assert_eq!(
            verdict_from_conclusion(Some("不合规")),
            Verdict::NonCompliant
        );
        assert_eq!(verdict_from_conclusion(Some("疑似")), Verdict::NonCompliant);
        assert_eq!(verdict_from_conclusion(None), Verdict::NonCompliant);
    }

    #[test]
    fn cached_token_freshness() {
        let fetched_at = Instant::now();
        let token = CachedToken {
            value: "tok".to_string(),
            fetched_at,
        };
        assert!(token.is_fresh_at(fetched_at));
        assert!(token.is_fresh_at(fetched_at + TOKEN_TTL - Duration::from_secs(1)));
        assert!(!token.is_fresh_at(fetched_at + TOKEN_TTL + Duration::from_secs(1)));
    }
}
