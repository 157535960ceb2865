use crate::ivr::Language;
use crate::plivo::is_valid_e164;
use anyhow::{bail, Error, Result};
use clap::Parser;
use serde::Deserialize;
use url::Url;

const DEMO_AUDIO_URL: &str = "https://s3.amazonaws.com/plivocloud/Trumpet.mp3";

#[derive(Parser, Debug)]
#[command(version, about = "IVR webhook responder for the Plivo voice API")]
pub struct Cli {
    #[clap(long)]
    pub conf: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub http_addr: String,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
    /// Public base URL Plivo uses to reach the webhook endpoints. Behind a
    /// tunnel this is the tunnel URL, not the bind address.
    pub base_url: String,
    pub plivo: PlivoConfig,
    /// Number shown to the called party, must belong to the Plivo account.
    pub caller_id: String,
    /// Number dialed when the caller asks for a live associate.
    pub associate_number: String,
    pub audio: AudioConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PlivoConfig {
    pub auth_id: String,
    pub auth_token: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AudioConfig {
    pub english: String,
    pub spanish: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            english: DEMO_AUDIO_URL.to_string(),
            spanish: DEMO_AUDIO_URL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            log_level: Some("info".to_string()),
            log_file: None,
            base_url: "http://localhost:8080".to_string(),
            plivo: PlivoConfig::default(),
            caller_id: String::new(),
            associate_number: String::new(),
            audio: AudioConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Error> {
        let config = toml::from_str(
            &std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("{}: {}", e, path))?,
        )?;
        Ok(config)
    }

    /// Environment variables override file values, so the binary also runs
    /// from a bare `.env` without any TOML file.
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var("PLIVO_AUTH_ID") {
            self.plivo.auth_id = value;
        }
        if let Ok(value) = std::env::var("PLIVO_AUTH_TOKEN") {
            self.plivo.auth_token = value;
        }
        if let Ok(value) = std::env::var("PLIVO_PHONE_NUMBER") {
            self.caller_id = value;
        }
        if let Ok(value) = std::env::var("ASSOCIATE_NUMBER") {
            self.associate_number = value;
        }
        if let Ok(value) = std::env::var("BASE_URL") {
            self.base_url = value;
        }
    }

    /// Fails fast on anything that would otherwise surface mid-call as a
    /// rejected API request or an unreachable webhook.
    pub fn validate(&self) -> Result<()> {
        if self.plivo.auth_id.is_empty() || self.plivo.auth_token.is_empty() {
            bail!("plivo credentials are not set (PLIVO_AUTH_ID / PLIVO_AUTH_TOKEN)");
        }
        if !is_valid_e164(&self.caller_id) {
            bail!("caller_id must be an E.164 number, got '{}'", self.caller_id);
        }
        if !is_valid_e164(&self.associate_number) {
            bail!(
                "associate_number must be an E.164 number, got '{}'",
                self.associate_number
            );
        }
        let base = Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("base_url '{}' is not a URL: {}", self.base_url, e))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("base_url must be http or https, got '{}'", self.base_url);
        }
        Ok(())
    }

    /// Absolute URL for a webhook path, as Plivo will fetch it.
    pub fn callback_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn audio_url(&self, lang: Language) -> &str {
        match lang {
            Language::English => &self.audio.english,
            Language::Spanish => &self.audio.spanish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.plivo.auth_id = "MA_TEST123".to_string();
        config.plivo.auth_token = "secret".to_string();
        config.caller_id = "+14155550100".to_string();
        config.associate_number = "+918031274121".to_string();
        config.base_url = "https://ivr.example.com".to_string();
        config
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
http_addr = "127.0.0.1:9090"
base_url = "https://tunnel.example.com"
caller_id = "+14155550100"
associate_number = "+918031274121"

[plivo]
auth_id = "MA_FILE"
auth_token = "file-secret"

[audio]
english = "https://cdn.example.com/en.mp3"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.http_addr, "127.0.0.1:9090");
        assert_eq!(config.plivo.auth_id, "MA_FILE");
        assert_eq!(config.audio.english, "https://cdn.example.com/en.mp3");
        // unset keys fall back to defaults
        assert_eq!(config.audio.spanish, DEMO_AUDIO_URL);
        assert_eq!(config.log_level, Some("info".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load("/nonexistent/ivrflow.toml").is_err());
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let mut config = valid_config();
        config.plivo.auth_token = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut config = valid_config();
        config.caller_id = "4155550100".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.associate_number = "associate".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = valid_config();
        config.base_url = "ivr.example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.base_url = "ftp://ivr.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_callback_url_joins_cleanly() {
        let mut config = valid_config();
        assert_eq!(
            config.callback_url("/ivr/welcome"),
            "https://ivr.example.com/ivr/welcome"
        );
        config.base_url = "https://ivr.example.com/".to_string();
        assert_eq!(
            config.callback_url("/ivr/welcome"),
            "https://ivr.example.com/ivr/welcome"
        );
    }

    #[test]
    fn test_audio_url_per_language() {
        let mut config = valid_config();
        config.audio.english = "https://cdn.example.com/en.mp3".to_string();
        config.audio.spanish = "https://cdn.example.com/es.mp3".to_string();
        assert_eq!(
            config.audio_url(Language::English),
            "https://cdn.example.com/en.mp3"
        );
        assert_eq!(
            config.audio_url(Language::Spanish),
            "https://cdn.example.com/es.mp3"
        );
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = valid_config();
        std::env::set_var("PLIVO_AUTH_ID", "MA_FROM_ENV");
        std::env::set_var("BASE_URL", "https://env.example.com");
        config.apply_env();
        std::env::remove_var("PLIVO_AUTH_ID");
        std::env::remove_var("BASE_URL");

        assert_eq!(config.plivo.auth_id, "MA_FROM_ENV");
        assert_eq!(config.base_url, "https://env.example.com");
        // values without a matching variable keep what they had
        assert_eq!(config.caller_id, "+14155550100");
    }
}
