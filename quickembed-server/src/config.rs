use std::ffi::OsString;

use clap::Parser;
use quickembed_core::embedding::LocalEmbedderConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8081;

#[derive(Parser)]
#[command(name = "quickembed-server", about = "HTTP gateway for text embeddings")]
struct Cli {
    /// Server port
    #[arg(long, value_name = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

/// Startup configuration, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub embedding: LocalEmbedderConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Build the config from the process arguments.
    ///
    /// Exits the process on `--help` (status 0) or on invalid arguments.
    pub fn load() -> Self {
        Self::from_args(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::try_parse_from(args).map(Self::from_cli)
    }

    fn from_cli(cli: Cli) -> Self {
        Self {
            server: ServerConfig {
                port: cli.port,
                ..ServerConfig::default()
            },
            embedding: LocalEmbedderConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn no_arguments_uses_defaults() {
        let config = Config::from_args(["quickembed-server"]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.bind_address(), "0.0.0.0:8081");
        assert_eq!(config.embedding, LocalEmbedderConfig::default());
    }

    #[test]
    fn port_flag_overrides_default() {
        let config = Config::from_args(["quickembed-server", "--port", "9000"]).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn help_flag_requests_usage_with_success_status() {
        for flag in ["--help", "-h"] {
            let err = Config::from_args(["quickembed-server", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
            assert_eq!(err.exit_code(), 0);
            let usage = err.to_string();
            assert!(usage.contains("--port"), "usage should list --port: {usage}");
            assert!(usage.contains("8081"), "usage should show the default: {usage}");
        }
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = Config::from_args(["quickembed-server", "--port", "abc"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = Config::from_args(["quickembed-server", "--model", "x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
