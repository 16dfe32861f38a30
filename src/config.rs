//! Configuration management for the travel agent service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TravelAgentError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that points at an explicit config file
pub const CONFIG_PATH_ENV: &str = "TRAVEL_AGENT_CONFIG";

/// Root configuration structure for the travel agent service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelAgentConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Completion service settings
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// OpenTelemetry export
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// PEM certificate chain, enables HTTPS together with `tls_key_path`
    pub tls_cert_path: Option<PathBuf>,
    /// PEM private key
    pub tls_key_path: Option<PathBuf>,
}

/// Completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// OpenAI-compatible API root, `/chat/completions` is appended
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_completion_model")]
    pub model: String,
    /// API key; when unset it is read from `api_key_env`
    pub api_key: Option<String>,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_completion_api_key_env")]
    pub api_key_env: String,
    /// Request timeout in seconds
    #[serde(default = "default_completion_timeout")]
    pub timeout_seconds: u32,
    /// Upper bound on generated tokens
    #[serde(default = "default_completion_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_completion_temperature")]
    pub temperature: f32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// OpenTelemetry export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// OTLP/HTTP collector endpoint; export is disabled when unset
    pub otlp_endpoint: Option<String>,
    /// Reported `service.name`
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_completion_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_completion_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_completion_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_completion_timeout() -> u32 {
    120
}

fn default_completion_max_tokens() -> u32 {
    4096
}

fn default_completion_temperature() -> f32 {
    0.7
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_service_name() -> String {
    "travel-agent".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            max_body_bytes: default_max_body_bytes(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_completion_base_url(),
            model: default_completion_model(),
            api_key: None,
            api_key_env: default_completion_api_key_env(),
            timeout_seconds: default_completion_timeout(),
            max_tokens: default_completion_max_tokens(),
            temperature: default_completion_temperature(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: default_service_name(),
        }
    }
}

impl TravelAgentConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVEL_AGENT_COMPLETION__MODEL -> completion.model
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_AGENT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelAgentConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_port_override(env::var("PORT").ok().as_deref())?;
        if config.telemetry.otlp_endpoint.is_none() {
            config.telemetry.otlp_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();
        }

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-agent").join("config.toml"))
    }

    /// Honour the conventional `PORT` variable used by container platforms
    pub fn apply_port_override(&mut self, port: Option<&str>) -> Result<()> {
        if let Some(port) = port.map(str::trim).filter(|p| !p.is_empty()) {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{port}'"))?;
        }
        Ok(())
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.max_body_bytes == 0 {
            self.server.max_body_bytes = default_max_body_bytes();
        }
        if self.completion.base_url.is_empty() {
            self.completion.base_url = default_completion_base_url();
        }
        if self.completion.model.is_empty() {
            self.completion.model = default_completion_model();
        }
        if self.completion.api_key_env.is_empty() {
            self.completion.api_key_env = default_completion_api_key_env();
        }
        if self.completion.timeout_seconds == 0 {
            self.completion.timeout_seconds = default_completion_timeout();
        }
        if self.completion.max_tokens == 0 {
            self.completion.max_tokens = default_completion_max_tokens();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.telemetry.service_name.is_empty() {
            self.telemetry.service_name = default_service_name();
        }
        if self
            .telemetry
            .otlp_endpoint
            .as_deref()
            .is_some_and(|endpoint| endpoint.trim().is_empty())
        {
            self.telemetry.otlp_endpoint = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_tls()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // An absent key is resolved from the environment when the client is built
        if let Some(api_key) = &self.completion.api_key {
            if api_key.is_empty() {
                return Err(TravelAgentError::config(
                    "Completion API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(TravelAgentError::config(
                    "Completion API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(TravelAgentError::config("Server port cannot be 0").into());
        }

        if self.completion.timeout_seconds > 600 {
            return Err(TravelAgentError::config(
                "Completion timeout cannot exceed 600 seconds",
            )
            .into());
        }

        if self.completion.max_tokens > 131_072 {
            return Err(TravelAgentError::config(
                "Completion max tokens cannot exceed 131072",
            )
            .into());
        }

        if !(0.0..=2.0).contains(&self.completion.temperature) {
            return Err(TravelAgentError::config(
                "Completion temperature must be between 0.0 and 2.0",
            )
            .into());
        }

        if self.server.max_body_bytes > 64 * 1024 * 1024 {
            return Err(TravelAgentError::config(
                "Maximum request body cannot exceed 64 MB",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelAgentError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelAgentError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !is_http_url(&self.completion.base_url) {
            return Err(TravelAgentError::config(
                "Completion base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if let Some(endpoint) = &self.telemetry.otlp_endpoint {
            if !is_http_url(endpoint) {
                return Err(TravelAgentError::config(
                    "OTLP endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Certificate and key come as a pair
    fn validate_tls(&self) -> Result<()> {
        match (&self.server.tls_cert_path, &self.server.tls_key_path) {
            (Some(_), None) | (None, Some(_)) => Err(TravelAgentError::config(
                "TLS needs both tls_cert_path and tls_key_path",
            )
            .into()),
            _ => Ok(()),
        }
    }
}

impl ServerConfig {
    /// Certificate and key paths, when both are configured
    #[must_use]
    pub fn tls_paths(&self) -> Option<(&Path, &Path)> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some((cert.as_path(), key.as_path())),
            _ => None,
        }
    }

    /// Whether HTTPS should be served
    #[must_use]
    pub fn tls_enabled(&self) -> bool {
        self.tls_paths().is_some()
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TravelAgentConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.completion.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.completion.model, "llama-3.3-70b-versatile");
        assert_eq!(config.completion.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.logging.level, "info");
        assert!(config.completion.api_key.is_none());
        assert!(config.telemetry.otlp_endpoint.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = TravelAgentConfig::default();
        config.completion.api_key = Some("short".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_valid_api_key() {
        let mut config = TravelAgentConfig::default();
        config.completion.api_key = Some("gsk_valid_api_key_123".to_string());
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TravelAgentConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TravelAgentConfig::default();
        config.completion.timeout_seconds = 900;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = TravelAgentConfig::default();
        config.completion.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = TravelAgentConfig::default();
        config.completion.base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("HTTP or HTTPS"));
    }

    #[test]
    fn test_tls_requires_both_paths() {
        let mut config = TravelAgentConfig::default();
        config.server.tls_cert_path = Some(PathBuf::from("cert.pem"));
        assert!(config.validate().is_err());
        assert!(!config.server.tls_enabled());
        assert_eq!(config.server.tls_paths(), None);

        config.server.tls_key_path = Some(PathBuf::from("key.pem"));
        assert!(config.validate().is_ok());
        assert!(config.server.tls_enabled());
        assert_eq!(
            config.server.tls_paths(),
            Some((Path::new("cert.pem"), Path::new("key.pem")))
        );
    }

    #[test]
    fn test_port_override() {
        let mut config = TravelAgentConfig::default();
        config.apply_port_override(Some("9090")).unwrap();
        assert_eq!(config.server.port, 9090);

        config.apply_port_override(None).unwrap();
        assert_eq!(config.server.port, 9090);

        config.apply_port_override(Some("  ")).unwrap();
        assert_eq!(config.server.port, 9090);

        let result = config.apply_port_override(Some("not-a-port"));
        assert!(result.unwrap_err().to_string().contains("PORT must be"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = TravelAgentConfig::default();
        config.completion.model.clear();
        config.logging.format.clear();
        config.telemetry.otlp_endpoint = Some(" ".to_string());
        config.apply_defaults();
        assert_eq!(config.completion.model, "llama-3.3-70b-versatile");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.telemetry.otlp_endpoint.is_none());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = env::temp_dir().join(format!("travel-agent-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8123

[completion]
model = "llama-3.1-8b-instant"
timeout_seconds = 45

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = TravelAgentConfig::load_from_path(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.completion.model, "llama-3.1-8b-instant");
        assert_eq!(config.completion.timeout_seconds, 45);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.completion.base_url, "https://api.groq.com/openai/v1");
        // PORT from the environment may legitimately override the file
        if env::var("PORT").is_err() {
            assert_eq!(config.server.port, 8123);
        }
    }

    #[test]
    fn test_config_path_generation() {
        let path = TravelAgentConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("travel-agent"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
