use clap::Parser;

use crate::config::GatewayConfig;

#[derive(Parser, Debug, Default)]
#[command(name = "hive-gateway")]
#[command(about = "HTTP gateway between the Hive web client and its backend services")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Listen port (overrides GATEWAY_PORT / PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Backend base URL (overrides BACKEND_API_URL)")]
    pub backend_url: Option<String>,

    #[arg(long, help = "Calendar service base URL (overrides CALENDAR_SERVICE_URL)")]
    pub calendar_url: Option<String>,

    #[arg(long, help = "Log request and response bodies, secrets redacted")]
    pub debug: bool,
}

impl Cli {
    /// Command-line flags win over the environment.
    pub fn apply(&self, mut config: GatewayConfig) -> anyhow::Result<GatewayConfig> {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.backend_url {
            config.backend.base_url = url.clone();
        }
        if let Some(url) = &self.calendar_url {
            config.backend.calendar_url = url.clone();
        }
        if self.debug {
            config.debug = true;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["hive-gateway", "--port", "4100", "--backend-url", "http://api.test", "--debug"]);
        let config = cli.apply(GatewayConfig::production()).unwrap();
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.backend.base_url, "http://api.test");
        assert!(config.debug);
    }

    #[test]
    fn no_flags_keep_config() {
        let config = Cli::default().apply(GatewayConfig::staging()).unwrap();
        assert_eq!(config.backend.base_url, GatewayConfig::staging().backend.base_url);
        assert!(!config.debug);
    }

    #[test]
    fn invalid_url_flag_rejected() {
        let cli = Cli::parse_from(["hive-gateway", "--calendar-url", "nope"]);
        assert!(cli.apply(GatewayConfig::development()).is_err());
    }
}
