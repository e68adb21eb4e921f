use crate::config::ClientConfig;
use crate::utils::error::{Result, UspsError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_SERVER_URL: &str = "USPS_SERVER_URL";
pub const ENV_USER_ID: &str = "USPS_USER_ID";
pub const ENV_TIMEOUT_MS: &str = "USPS_TIMEOUT_MS";

/// Loosely-typed settings as read from a file or the environment.
///
/// ```toml
/// [usps]
/// server_url = "https://secure.shippingapis.com/ShippingAPI.dll"
/// user_id = "${USPS_USER_ID}"
/// timeout_ms = 30000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UspsSettings {
    #[serde(default)]
    pub usps: ConnectionSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub server_url: Option<String>,
    pub user_id: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl UspsSettings {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            UspsError::config("config_file", format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| UspsError::config("toml_parsing", format!("TOML parsing error: {}", e)))
    }

    /// 從環境變數讀取 (USPS_SERVER_URL / USPS_USER_ID / USPS_TIMEOUT_MS)
    pub fn from_env() -> Result<Self> {
        let timeout_ms = match std::env::var(ENV_TIMEOUT_MS) {
            Ok(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                UspsError::config(ENV_TIMEOUT_MS, format!("'{}' is not a number: {}", raw, e))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            usps: ConnectionSettings {
                server_url: std::env::var(ENV_SERVER_URL).ok(),
                user_id: std::env::var(ENV_USER_ID).ok(),
                timeout_ms,
            },
        })
    }

    /// Fill every unset field from `other`.
    pub fn or(self, other: UspsSettings) -> Self {
        Self {
            usps: ConnectionSettings {
                server_url: self.usps.server_url.or(other.usps.server_url),
                user_id: self.usps.user_id.or(other.usps.user_id),
                timeout_ms: self.usps.timeout_ms.or(other.usps.timeout_ms),
            },
        }
    }

    /// 替換環境變數 (例如 ${USPS_USER_ID})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| UspsError::config("toml_parsing", e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn into_client_config(self) -> Result<ClientConfig> {
        ClientConfig::from_parts(self.usps.server_url, self.usps.user_id, self.usps.timeout_ms)
    }
}

impl Validate for UspsSettings {
    fn validate(&self) -> Result<()> {
        self.clone().into_client_config().map(|_| ())
    }
}
