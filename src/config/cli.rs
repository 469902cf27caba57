use crate::config::{LogFormat, ServiceConfig, TomlConfig};
use crate::utils::error::Result;
use clap::Args;
use std::path::PathBuf;

/// Flags shared by every binary. Anything left unset falls back to the
/// TOML file, then to the built-in defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[arg(long)]
    pub listen: Option<String>,

    /// Total race timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// BrasilAPI CEP base URL
    #[arg(long)]
    pub brasil_api_url: Option<String>,

    /// ViaCep base URL
    #[arg(long)]
    pub via_cep_url: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.apply_to(ServiceConfig::default()),
            None => ServiceConfig::default(),
        };

        if let Some(listen) = &self.listen {
            config.listen = listen.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(url) = &self.brasil_api_url {
            config.brasil_api_url = url.clone();
        }
        if let Some(url) = &self.via_cep_url {
            config.via_cep_url = url.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config.verbose |= self.verbose;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    #[test]
    fn test_flags_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[race]\ntimeout_ms = 400\n\n[providers.via_cep]\nbase_url = \"http://file/ws\"\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = TestCli::parse_from(["test", "--config", &path, "--timeout-ms", "900"]);
        let config = cli.config.resolve().unwrap();

        assert_eq!(config.timeout_ms, 900);
        assert_eq!(config.via_cep_url, "http://file/ws");
        assert_eq!(config.listen, crate::config::DEFAULT_LISTEN);
    }

    #[test]
    fn test_no_flags_yield_defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.config.resolve().unwrap(), ServiceConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let cli = TestCli::parse_from(["test", "--config", "/nonexistent/cep-race.toml"]);
        assert!(cli.config.resolve().is_err());
    }
}
