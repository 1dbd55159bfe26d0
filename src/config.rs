use crate::cli::{Cli, ColorChoice, OutputFormat, VerbosityLevel};
use crate::http_client::HttpClientConfig;
use crate::pipeline::ValidationOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound for `output.context_lines`
pub const MAX_CONTEXT_LINES: usize = 20;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
///
/// Every section is optional in a file; missing keys keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub validation: ValidationConfig,
    pub network: NetworkConfig,
    pub output: OutputConfig,
}

/// Validation-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum number of issues to report, 0 for unbounded
    pub max_errors: usize,
    /// Extra diagnostics while checking
    pub debug: bool,
    /// Accept CDATA sections that close on a later line
    pub cdata_span_tracking: bool,
    /// Do not report numeric character references as hex colors
    pub skip_char_references: bool,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
    /// Overrides the default `xmlcheck/<version>` user agent
    pub user_agent: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// When to color the human report
    pub color: ColorChoice,
    /// Lines shown before and after each issue
    pub context_lines: usize,
    /// Print correction tips after the issue list
    pub show_tips: bool,
    /// Verbose output
    pub verbose: bool,
    /// Quiet mode (verdict only)
    pub quiet: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_errors: ValidationOptions::default().max_issues,
            debug: false,
            cdata_span_tracking: false,
            skip_char_references: false,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorChoice::Auto,
            context_lines: 2,
            show_tips: true,
            verbose: false,
            quiet: false,
        }
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            config = Self::load_from_file(config_path).await?;
        } else if let Some(found_config) = Self::find_config_file().await? {
            config = found_config;
        }

        config = Self::apply_environment_overrides(config)?;
        config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Candidate configuration paths, in search order
    pub fn config_search_paths() -> Vec<PathBuf> {
        let config_names = [
            "xmlcheck.toml",
            "xmlcheck.json",
            ".xmlcheck.toml",
            ".xmlcheck.json",
        ];

        let mut paths: Vec<PathBuf> = config_names.iter().map(PathBuf::from).collect();
        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("xmlcheck");
            paths.extend(config_names.iter().map(|name| app_config_dir.join(name)));
        }
        paths
    }

    /// Find configuration file in standard locations
    pub async fn find_config_file() -> Result<Option<Config>> {
        for path in Self::config_search_paths() {
            if path.exists() {
                log::debug!("using configuration file {}", path.display());
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(max_errors) = env.get("XMLCHECK_MAX_ERRORS") {
            config.validation.max_errors = parse_env("XMLCHECK_MAX_ERRORS", &max_errors)?;
        }

        if let Some(debug) = env.get("XMLCHECK_DEBUG") {
            config.validation.debug = parse_env("XMLCHECK_DEBUG", &debug)?;
        }

        if let Some(timeout) = env.get("XMLCHECK_TIMEOUT") {
            config.network.timeout_seconds = parse_env("XMLCHECK_TIMEOUT", &timeout)?;
        }

        if let Some(context_lines) = env.get("XMLCHECK_CONTEXT_LINES") {
            config.output.context_lines = parse_env("XMLCHECK_CONTEXT_LINES", &context_lines)?;
        }

        if let Some(format) = env.get("XMLCHECK_FORMAT") {
            config.output.format = match format.to_lowercase().as_str() {
                "human" => OutputFormat::Human,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid XMLCHECK_FORMAT value: {}",
                        format
                    )));
                }
            };
        }

        if let Some(color) = env.get("XMLCHECK_COLOR") {
            config.output.color = match color.to_lowercase().as_str() {
                "auto" => ColorChoice::Auto,
                "always" => ColorChoice::Always,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid XMLCHECK_COLOR value: {}",
                        color
                    )));
                }
            };
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration
    ///
    /// Only flags that were actually given override the configuration.
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if let Some(max_errors) = cli.max_errors {
            config.validation.max_errors = max_errors;
        }
        if cli.debug {
            config.validation.debug = true;
        }
        if cli.cdata_span_tracking {
            config.validation.cdata_span_tracking = true;
        }
        if cli.skip_char_references {
            config.validation.skip_char_references = true;
        }

        if let Some(timeout) = cli.timeout {
            config.network.timeout_seconds = timeout;
        }

        if let Some(format) = cli.format {
            config.output.format = format;
        }
        if let Some(color) = cli.color_choice() {
            config.output.color = color;
        }
        if let Some(context_lines) = cli.context_lines {
            config.output.context_lines = context_lines;
        }
        if cli.no_tips {
            config.output.show_tips = false;
        }
        if cli.verbose {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
        }

        config
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.network.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if config.output.context_lines > MAX_CONTEXT_LINES {
            return Err(ConfigError::Validation(format!(
                "Context lines cannot exceed {}",
                MAX_CONTEXT_LINES
            )));
        }

        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        if let Some(agent) = &config.network.user_agent
            && agent.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "User agent cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Options for the validation pipeline
    pub fn validation_options(config: &Config) -> ValidationOptions {
        ValidationOptions {
            max_issues: config.validation.max_errors,
            debug: config.validation.debug,
            cdata_span_tracking: config.validation.cdata_span_tracking,
            skip_char_references: config.validation.skip_char_references,
        }
    }

    /// Settings for downloading remote documents
    pub fn http_config(config: &Config) -> HttpClientConfig {
        let mut http = HttpClientConfig {
            timeout_seconds: config.network.timeout_seconds,
            ..HttpClientConfig::default()
        };
        if let Some(agent) = &config.network.user_agent {
            http.user_agent = agent.clone();
        }
        http
    }

    /// Effective verbosity; debug wins over verbose, quiet wins over both
    pub fn verbosity(config: &Config) -> VerbosityLevel {
        if config.output.quiet {
            VerbosityLevel::Quiet
        } else if config.validation.debug {
            VerbosityLevel::Debug
        } else if config.output.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Environment(format!("Invalid {} value: {}", key, value)))
}
