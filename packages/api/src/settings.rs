//! Where the REST API lives and how long to wait for it.
//!
//! Native builds read, in order of precedence, `HRMS_*` environment variables
//! (a `.env` file is loaded first), an optional `config.toml`, then the
//! built-in defaults. Browser builds have no environment at runtime, so the
//! values are baked in at compile time from the same variable names.

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("base_url must start with http:// or https://, got {0:?}")]
    BaseUrl(String),
    #[error("invalid timeout {0:?}")]
    Timeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    /// Request timeout. Ignored in the browser, where fetch has no timeout.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiSettings {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, SettingsError> {
        use config::{Config, Environment, File, FileFormat};

        dotenvy::dotenv().ok();

        let settings: Self = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("HRMS").try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validated()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, SettingsError> {
        let timeout_secs = match option_env!("HRMS_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| SettingsError::Timeout(raw.to_string()))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Self {
            base_url: option_env!("HRMS_BASE_URL")
                .unwrap_or(DEFAULT_BASE_URL)
                .to_string(),
            timeout_secs,
        }
        .validated()
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Strip trailing slashes and reject non-HTTP base URLs.
    pub fn validated(mut self) -> Result<Self, SettingsError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(SettingsError::BaseUrl(self.base_url));
        }
        self.base_url = trimmed.to_string();
        if self.timeout_secs == 0 {
            return Err(SettingsError::Timeout("0".to_string()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ApiSettings::default();
        assert_eq!(settings.base_url, "http://localhost:8000/api");
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.validated().is_ok());
    }

    #[test]
    fn test_validated_trims_trailing_slash() {
        let settings = ApiSettings::default()
            .with_base_url("https://hr.example.com/api/ ")
            .validated()
            .unwrap();
        assert_eq!(settings.base_url, "https://hr.example.com/api");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ApiSettings::default().with_base_url("ftp://x").validated(),
            Err(SettingsError::BaseUrl(_))
        ));
        let zero = ApiSettings {
            timeout_secs: 0,
            ..ApiSettings::default()
        };
        assert!(matches!(zero.validated(), Err(SettingsError::Timeout(_))));
    }
}
