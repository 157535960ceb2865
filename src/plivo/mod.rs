//! Plivo voice API client and phone number helpers.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

pub mod xml;

pub const API_BASE: &str = "https://api.plivo.com";
const CALL_TIMEOUT_SECS: u64 = 10;

static E164_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").unwrap());

pub fn is_valid_e164(number: &str) -> bool {
    E164_RE.is_match(number)
}

/// Strips common formatting characters and, for bare digit strings, assumes
/// the caller meant an international number and prepends `+`. Returns `None`
/// when the result is not a valid E.164 number.
pub fn normalize_destination(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let candidate = if cleaned.starts_with('+') {
        cleaned
    } else if cleaned.chars().all(|c| c.is_ascii_digit()) {
        format!("+{}", cleaned)
    } else {
        return None;
    };
    if is_valid_e164(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

/// Body of `POST /v1/Account/{auth_id}/Call/`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCallRequest {
    pub from: String,
    pub to: String,
    pub answer_url: String,
    pub answer_method: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallCreated {
    pub request_uuid: String,
    #[serde(default)]
    pub api_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum VoiceApiError {
    #[error("plivo api rejected the call request: {status} {detail}")]
    Api { status: u16, detail: String },
    #[error("plivo api request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait VoiceApi: Send + Sync {
    async fn create_call(&self, request: CreateCallRequest)
        -> Result<CallCreated, VoiceApiError>;
}

pub struct PlivoClient {
    http: HttpClient,
    api_base: String,
    auth_id: String,
    auth_token: String,
}

impl PlivoClient {
    pub fn new(auth_id: String, auth_token: String) -> Result<Self, VoiceApiError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(CALL_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            api_base: API_BASE.to_string(),
            auth_id,
            auth_token,
        })
    }

    /// Point the client at a different API host, used by tests.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn call_endpoint(&self) -> String {
        format!("{}/v1/Account/{}/Call/", self.api_base, self.auth_id)
    }
}

#[async_trait]
impl VoiceApi for PlivoClient {
    async fn create_call(
        &self,
        request: CreateCallRequest,
    ) -> Result<CallCreated, VoiceApiError> {
        let started_at = Instant::now();
        let response = self
            .http
            .post(self.call_endpoint())
            .basic_auth(&self.auth_id, Some(&self.auth_token))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                detail = detail.as_str(),
                "plivo rejected the call request"
            );
            return Err(VoiceApiError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let created: CallCreated = response.json().await?;
        info!(
            to = request.to.as_str(),
            request_uuid = created.request_uuid.as_str(),
            cost_ms = started_at.elapsed().as_millis() as u64,
            "outbound call created"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_e164() {
        assert!(is_valid_e164("+14155550100"));
        assert!(is_valid_e164("+918031274121"));
        assert!(is_valid_e164("+4930123456"));
        assert!(!is_valid_e164("14155550100"));
        assert!(!is_valid_e164("+0123456"));
        assert!(!is_valid_e164("+1"));
        assert!(!is_valid_e164("+123456789012345678"));
        assert!(!is_valid_e164(""));
        assert!(!is_valid_e164("+1415555a100"));
    }

    #[test]
    fn test_normalize_destination() {
        assert_eq!(
            normalize_destination("+1 (415) 555-0100"),
            Some("+14155550100".to_string())
        );
        assert_eq!(
            normalize_destination("14155550100"),
            Some("+14155550100".to_string())
        );
        assert_eq!(
            normalize_destination("  +44 20 7946 0958  "),
            Some("+442079460958".to_string())
        );
        assert_eq!(
            normalize_destination("91.80.31.27.41.21"),
            Some("+918031274121".to_string())
        );
        assert_eq!(normalize_destination("not-a-number"), None);
        assert_eq!(normalize_destination(""), None);
        assert_eq!(normalize_destination("   "), None);
        assert_eq!(normalize_destination("+"), None);
        assert_eq!(normalize_destination("0800123456"), None);
        assert_eq!(normalize_destination("++14155550100"), None);
    }

    #[test]
    fn test_call_endpoint_includes_account() {
        let client = PlivoClient::new("MA_TEST123".to_string(), "secret".to_string())
            .unwrap()
            .with_api_base("https://mock.plivo.test/");
        assert_eq!(
            client.call_endpoint(),
            "https://mock.plivo.test/v1/Account/MA_TEST123/Call/"
        );
    }
}
