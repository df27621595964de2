use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    tommotica: Tommotica,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("TOMMOTICA").separator("__").try_parsing(true));

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppConfigError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn tommotica(&self) -> &Tommotica {
        &self.tommotica
    }
}

#[derive(Debug, Deserialize)]
pub struct Tommotica {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_username")]
    username: String,
    password: Option<String>,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    request_timeout: Duration,
    #[serde(default = "default_retry_delay", with = "humantime_serde")]
    retry_delay: Duration,
    #[serde(default = "default_retry_max_delay", with = "humantime_serde")]
    retry_max_delay: Duration,
    #[serde(default = "default_stale_connection_timeout", with = "humantime_serde")]
    stale_connection_timeout: Duration,
    #[serde(default = "default_discovery_attempts")]
    discovery_attempts: usize,
}

impl Tommotica {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn retry_max_delay(&self) -> Duration {
        self.retry_max_delay
    }

    pub fn stale_connection_timeout(&self) -> Duration {
        self.stale_connection_timeout
    }

    pub fn discovery_attempts(&self) -> usize {
        self.discovery_attempts
    }
}

fn default_port() -> u16 {
    8998
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_retry_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_stale_connection_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_discovery_attempts() -> usize {
    5
}

#[derive(Error, Debug)]
pub enum AppConfigError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                tommotica: Tommotica {
                    host: "tommotica.local".to_string(),
                    port: default_port(),
                    username: default_username(),
                    password: None,
                    request_timeout: Duration::from_secs(2),
                    retry_delay: Duration::from_millis(10),
                    retry_max_delay: Duration::from_millis(50),
                    stale_connection_timeout: Duration::from_secs(5),
                    discovery_attempts: 1,
                },
            },
        }
    }

    /// Points the configuration at a server url such as `http://127.0.0.1:1234`.
    pub fn server_url(mut self, url: String) -> Self {
        let address = url.trim_start_matches("http://");
        if let Some((host, port)) = address.rsplit_once(':') {
            self.config.tommotica.host = host.to_string();
            self.config.tommotica.port = port.parse().unwrap_or(default_port());
        }
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.config.tommotica.password = Some(password.to_string());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.tommotica.request_timeout = timeout;
        self
    }

    pub fn discovery_attempts(mut self, attempts: usize) -> Self {
        self.config.tommotica.discovery_attempts = attempts;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use pretty_assertions::assert_eq;

    fn from_toml(toml: &str) -> Result<AppConfig, AppConfigError> {
        AppConfig::from_builder(Config::builder().add_source(config::File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn applies_defaults() -> Result<(), AppConfigError> {
        let config = from_toml("[tommotica]\nhost = \"192.168.1.20\"")?;

        let tommotica = config.tommotica();
        assert_eq!(tommotica.base_url(), "http://192.168.1.20:8998");
        assert_eq!(tommotica.username(), "admin");
        assert_eq!(tommotica.password(), None);
        assert_eq!(tommotica.request_timeout(), Duration::from_secs(10));
        assert_eq!(tommotica.retry_delay(), Duration::from_millis(500));
        assert_eq!(tommotica.retry_max_delay(), Duration::from_secs(30));
        assert_eq!(tommotica.stale_connection_timeout(), Duration::from_secs(60));
        assert_eq!(tommotica.discovery_attempts(), 5);
        Ok(())
    }

    #[test]
    fn reads_all_fields() -> Result<(), AppConfigError> {
        let toml = r#"
            [tommotica]
            host = "house"
            port = 9000
            username = "owner"
            password = "secret"
            request_timeout = "3s"
            retry_delay = "1s"
            retry_max_delay = "1m"
            stale_connection_timeout = "45s"
            discovery_attempts = 2
        "#;

        let config = from_toml(toml)?;

        let tommotica = config.tommotica();
        assert_eq!(tommotica.host(), "house");
        assert_eq!(tommotica.port(), 9000);
        assert_eq!(tommotica.username(), "owner");
        assert_eq!(tommotica.password(), Some("secret"));
        assert_eq!(tommotica.request_timeout(), Duration::from_secs(3));
        assert_eq!(tommotica.retry_delay(), Duration::from_secs(1));
        assert_eq!(tommotica.retry_max_delay(), Duration::from_secs(60));
        assert_eq!(tommotica.stale_connection_timeout(), Duration::from_secs(45));
        assert_eq!(tommotica.discovery_attempts(), 2);
        Ok(())
    }

    #[test]
    fn fails_without_a_host() {
        let result = from_toml("[tommotica]\nport = 9000");

        assert!(result.is_err());
    }

    #[test]
    fn server_url_sets_host_and_port() {
        let config = AppConfigBuilder::new().server_url("http://127.0.0.1:4321".to_string()).build();

        assert_eq!(config.tommotica().base_url(), "http://127.0.0.1:4321");
    }
}
