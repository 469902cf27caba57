use crate::config::{LogFormat, ServiceConfig};
use crate::utils::error::{LookupError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub race: Option<RaceSection>,
    pub providers: Option<ProvidersSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceSection {
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersSection {
    pub brasil_api: Option<ProviderSection>,
    pub via_cep: Option<ProviderSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub format: Option<LogFormat>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LookupError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LookupError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VIACEP_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LookupError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overlays every value present in the file onto `base`.
    pub fn apply_to(&self, mut base: ServiceConfig) -> ServiceConfig {
        if let Some(listen) = self.server.as_ref().and_then(|s| s.listen.clone()) {
            base.listen = listen;
        }
        if let Some(timeout_ms) = self.race.as_ref().and_then(|r| r.timeout_ms) {
            base.timeout_ms = timeout_ms;
        }
        if let Some(providers) = &self.providers {
            if let Some(url) = providers.brasil_api.as_ref().and_then(|p| p.base_url.clone()) {
                base.brasil_api_url = url;
            }
            if let Some(url) = providers.via_cep.as_ref().and_then(|p| p.base_url.clone()) {
                base.via_cep_url = url;
            }
        }
        if let Some(logging) = &self.logging {
            if let Some(format) = logging.format {
                base.log_format = format;
            }
            if let Some(verbose) = logging.verbose {
                base.verbose = verbose;
            }
        }
        base
    }
}
