pub mod cli;
pub mod toml_config;

use crate::adapters::{brasil_api, via_cep};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_socket_addr, validate_url, Validate};
use serde::{Deserialize, Serialize};

pub use cli::ConfigArgs;
pub use toml_config::TomlConfig;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const MAX_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Effective configuration after the TOML file and CLI flags are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub listen: String,
    pub timeout_ms: u64,
    pub brasil_api_url: String,
    pub via_cep_url: String,
    pub log_format: LogFormat,
    pub verbose: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            brasil_api_url: brasil_api::DEFAULT_BASE_URL.to_string(),
            via_cep_url: via_cep::DEFAULT_BASE_URL.to_string(),
            log_format: LogFormat::Compact,
            verbose: false,
        }
    }
}

impl ConfigProvider for ServiceConfig {
    fn listen_addr(&self) -> &str {
        &self.listen
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn brasil_api_url(&self) -> &str {
        &self.brasil_api_url
    }

    fn via_cep_url(&self) -> &str {
        &self.via_cep_url
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.listen", &self.listen)?;
        validate_range("race.timeout_ms", self.timeout_ms, 1, MAX_TIMEOUT_MS)?;
        validate_url("providers.brasil_api.base_url", &self.brasil_api_url)?;
        validate_url("providers.via_cep.base_url", &self.via_cep_url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_ms(), 1000);
        assert_eq!(config.via_cep_url(), "https://viacep.com.br/ws");
        assert_eq!(config.listen_addr(), DEFAULT_LISTEN);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = ServiceConfig {
            timeout_ms: 0,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
