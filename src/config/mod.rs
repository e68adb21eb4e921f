#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;

use crate::utils::error::{Result, UspsError};
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 100_000;

/// Immutable client configuration, validated at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    server_url: String,
    user_id: String,
    timeout_ms: u64,
}

impl ClientConfig {
    /// 建立配置；server_url 與 user_id 為必填
    pub fn new(server_url: impl Into<String>, user_id: impl Into<String>) -> Result<Self> {
        let config = Self {
            server_url: server_url.into(),
            user_id: user_id.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self> {
        validation::validate_positive_number("timeout_ms", timeout_ms, 1)?;
        self.timeout_ms = timeout_ms;
        Ok(self)
    }

    /// Build from optional parts, failing on the first missing required field.
    pub fn from_parts(
        server_url: Option<String>,
        user_id: Option<String>,
        timeout_ms: Option<u64>,
    ) -> Result<Self> {
        let server_url = validation::validate_required_field("server_url", &server_url)?;
        let user_id = validation::validate_required_field("user_id", &user_id)?;
        let config = Self::new(server_url.clone(), user_id.clone())?;
        match timeout_ms {
            Some(timeout_ms) => config.with_timeout_ms(timeout_ms),
            None => Ok(config),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        if self.server_url.is_empty() {
            return Err(UspsError::config("server_url", "Must pass server_url"));
        }
        validation::validate_non_empty_string("user_id", &self.user_id)?;
        validation::validate_url("server_url", &self.server_url)?;
        validation::validate_positive_number("timeout_ms", self.timeout_ms, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_default_timeout() {
        let config = ClientConfig::new("https://secure.shippingapis.com/ShippingAPI.dll", "USER").unwrap();
        assert_eq!(config.timeout_ms(), DEFAULT_TIMEOUT_MS);
        assert_eq!(config.timeout(), Duration::from_millis(100_000));
        assert_eq!(config.user_id(), "USER");
    }

    #[test]
    fn test_missing_server_url_fails() {
        let err = ClientConfig::new("", "USER").unwrap_err();
        assert!(matches!(err, UspsError::Config { ref field, .. } if field == "server_url"));

        let err = ClientConfig::from_parts(None, Some("USER".to_string()), None).unwrap_err();
        assert!(matches!(err, UspsError::Config { ref field, .. } if field == "server_url"));
    }

    #[test]
    fn test_missing_user_id_fails() {
        let err = ClientConfig::new("https://example.com", "  ").unwrap_err();
        assert!(matches!(err, UspsError::Config { ref field, .. } if field == "user_id"));

        let err = ClientConfig::from_parts(Some("https://example.com".to_string()), None, None)
            .unwrap_err();
        assert!(matches!(err, UspsError::Config { ref field, .. } if field == "user_id"));
    }

    #[test]
    fn test_timeout_override_and_validation() {
        let config = ClientConfig::from_parts(
            Some("http://localhost:8080/api".to_string()),
            Some("USER".to_string()),
            Some(2500),
        )
        .unwrap();
        assert_eq!(config.timeout_ms(), 2500);

        assert!(config.with_timeout_ms(0).is_err());
    }

    #[test]
    fn test_invalid_server_url_scheme() {
        assert!(ClientConfig::new("ftp://example.com", "USER").is_err());
        assert!(ClientConfig::new("not a url", "USER").is_err());
    }
}
