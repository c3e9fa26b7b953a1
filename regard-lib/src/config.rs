//! Configuration file parsing and environment overrides.
//!
//! Files are TOML with a single `[defaults]` table. Discovery merges every
//! file found, later locations overriding earlier ones; environment variables
//! (`REGARD_*`) sit above files and CLI flags above everything.

use crate::error::RegardError;
use crate::lookup::ProtocolPreference;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// "auto", "rdap" or "whois"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Per-request timeout (as string, e.g., "5s", "30s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Colored terminal output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Summary JSON instead of the terminal layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl DefaultsConfig {
    /// Parsed protocol preference, if one is set.
    pub fn protocol_preference(&self) -> Result<Option<ProtocolPreference>, RegardError> {
        self.protocol
            .as_deref()
            .map(str::parse::<ProtocolPreference>)
            .transpose()
    }

    /// Parsed timeout in seconds, if one is set.
    pub fn timeout_secs(&self) -> Result<Option<u64>, RegardError> {
        self.timeout
            .as_deref()
            .map(|value| {
                parse_timeout_string(value).ok_or_else(|| invalid_timeout(value))
            })
            .transpose()
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Log which files were found and merged
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, RegardError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RegardError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            RegardError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            RegardError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Lowest to highest: XDG config, `~/.regard.toml`, then `./regard.toml`
    /// or `./.regard.toml`. A file that exists but does not parse is an error.
    pub fn discover_and_load(&self) -> Result<FileConfig, RegardError> {
        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        for path in candidates.into_iter().flatten() {
            let config = self.load_file(&path)?;
            merged_config = self.merge_configs(merged_config, config);
            loaded_files.push(path);
        }

        if self.verbose {
            for path in &loaded_files {
                debug!(path = %path.display(), "loaded config file");
            }
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./regard.toml", "./.regard.toml"]
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let path = Path::new(&home).join(".regard.toml");
        path.exists().then_some(path)
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("regard").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations; values from `higher` win.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(lower_defaults), Some(higher_defaults)) => Some(DefaultsConfig {
                    protocol: higher_defaults.protocol.or(lower_defaults.protocol),
                    timeout: higher_defaults.timeout.or(lower_defaults.timeout),
                    color: higher_defaults.color.or(lower_defaults.color),
                    json: higher_defaults.json.or(lower_defaults.json),
                }),
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
        }
    }

    fn validate_config(&self, config: &FileConfig) -> Result<(), RegardError> {
        if let Some(defaults) = &config.defaults {
            defaults.protocol_preference()?;
            defaults.timeout_secs()?;
        }
        Ok(())
    }
}

/// Configuration values read from `REGARD_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub protocol: Option<ProtocolPreference>,
    pub timeout_secs: Option<u64>,
    pub no_color: Option<bool>,
    pub json: Option<bool>,
    pub config: Option<String>,
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok())
}

/// Load configuration from an arbitrary variable source.
pub fn load_env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(value) = lookup("REGARD_PROTOCOL") {
        match value.parse::<ProtocolPreference>() {
            Ok(preference) => {
                debug!(%preference, "using REGARD_PROTOCOL");
                env_config.protocol = Some(preference);
            }
            Err(_) => warn!(%value, "invalid REGARD_PROTOCOL, use auto/rdap/whois"),
        }
    }

    if let Some(value) = lookup("REGARD_TIMEOUT") {
        match parse_timeout_string(&value) {
            Some(secs) => {
                debug!(secs, "using REGARD_TIMEOUT");
                env_config.timeout_secs = Some(secs);
            }
            None => warn!(%value, "invalid REGARD_TIMEOUT, use format like '5s', '30s', '2m'"),
        }
    }

    if let Some(value) = lookup("REGARD_NO_COLOR") {
        env_config.no_color = parse_env_bool("REGARD_NO_COLOR", &value);
    }

    if let Some(value) = lookup("REGARD_JSON") {
        env_config.json = parse_env_bool("REGARD_JSON", &value);
    }

    if let Some(path) = lookup("REGARD_CONFIG") {
        if !path.trim().is_empty() {
            env_config.config = Some(path);
        }
    }

    env_config
}

fn parse_env_bool(name: &str, value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => {
            warn!(variable = name, value, "invalid boolean, use true/false");
            None
        }
    }
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// A bare number is taken as seconds. Zero is rejected.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let secs = if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    };

    secs.filter(|&s| s > 0)
}

fn invalid_timeout(value: &str) -> RegardError {
    RegardError::config(format!(
        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
        value
    ))
}
