use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use treehash_core::{HashAlgorithm, PathFilter, ScanConfig};

use crate::output::OutputFormat;
use crate::size::parse_size;

/// Prefix of environment variables that override the config file
pub const ENV_PREFIX: &str = "TREEHASH_";

/// Keys `config set` accepts
pub const KNOWN_KEYS: &[&str] = &[
    "scan.workers",
    "scan.queue_capacity",
    "scan.max_hash_size",
    "scan.algorithm",
    "scan.exclude",
    "scan.buffer_size",
    "output.format",
    "output.stats",
];

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Print a summary to stderr after each scan
    pub stats: bool,
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    fn default_config_path() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return PathBuf::from(xdg_config).join("treehash/config.toml");
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("treehash")
            .join("config.toml")
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    ///
    /// Command line flags are applied on top by the caller.
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new();

        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().with_context(|| {
            format!(
                "Failed to load configuration from {}",
                self.config_path.display()
            )
        })
    }

    /// Get a configuration value by key (dot notation)
    pub fn get(&self, key: &str) -> Result<String> {
        let value = self.effective_table()?;

        let mut current = &value;
        for part in key.split('.') {
            match current {
                toml::Value::Table(table) => match table.get(part) {
                    Some(next) => current = next,
                    None if KNOWN_KEYS.contains(&key) => return Ok("unset".to_string()),
                    None => anyhow::bail!("Key '{}' not found", key),
                },
                _ => anyhow::bail!("Invalid key path: {}", key),
            }
        }

        simple_value(current)
            .ok_or_else(|| anyhow::anyhow!("Value at '{}' is not a simple type", key))
    }

    /// Set a configuration value by key (dot notation)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parsed_value = parse_config_value(key, value)?;

        let mut config = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path).with_context(|| {
                format!("Failed to read {}", self.config_path.display())
            })?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", self.config_path.display()))?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        // Known keys are always `section.field`
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("Invalid key path: {}", key))?;

        let toml::Value::Table(root) = &mut config else {
            anyhow::bail!("Configuration file is not a table");
        };
        let section_value = root
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
        let toml::Value::Table(section_table) = section_value else {
            anyhow::bail!("Invalid key path: expected table at '{}'", section);
        };
        section_table.insert(field.to_string(), parsed_value);

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(&self.config_path, toml_string)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;

        Ok(())
    }

    /// List all configuration values
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let value = self.effective_table()?;

        let mut items = Vec::new();
        collect_values(&value, String::new(), &mut items);
        items.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(items)
    }

    fn effective_table(&self) -> Result<toml::Value> {
        let config = self.load()?;
        let toml_string = toml::to_string(&config)?;
        Ok(toml::from_str(&toml_string)?)
    }
}

fn simple_value(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Recursively collect all key-value pairs from TOML
fn collect_values(value: &toml::Value, prefix: String, items: &mut Vec<(String, String)>) {
    if let toml::Value::Table(table) = value {
        for (key, val) in table {
            let new_prefix = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            collect_values(val, new_prefix, items);
        }
    } else if let Some(s) = simple_value(value) {
        items.push((prefix, s));
    }
}

fn positive_integer(key: &str, value: &str) -> Result<toml::Value> {
    let n: i64 = value
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a positive integer"))?;
    if n < 1 {
        anyhow::bail!("{} must be at least 1", key);
    }
    Ok(toml::Value::Integer(n))
}

fn positive_size(key: &str, value: &str) -> Result<toml::Value> {
    let bytes = parse_size(value).map_err(|e| anyhow::anyhow!(e))?;
    if bytes == 0 {
        anyhow::bail!("{} must be greater than 0", key);
    }
    let bytes = i64::try_from(bytes).with_context(|| format!("{key} is too large"))?;
    Ok(toml::Value::Integer(bytes))
}

/// Validate a value and convert it to the TOML type its key expects
fn parse_config_value(key: &str, value: &str) -> Result<toml::Value> {
    match key {
        "scan.workers" | "scan.queue_capacity" => positive_integer(key, value),
        "scan.max_hash_size" | "scan.buffer_size" => positive_size(key, value),
        "scan.algorithm" => {
            let algorithm = HashAlgorithm::from_str(value)?;
            Ok(toml::Value::String(algorithm.id().to_string()))
        }
        "scan.exclude" => {
            if !value.is_empty() {
                PathFilter::new(value)?;
            }
            Ok(toml::Value::String(value.to_string()))
        }
        "output.format" => {
            let format = OutputFormat::from_string(value)?;
            let name = match format {
                OutputFormat::Text => "text",
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
            };
            Ok(toml::Value::String(name.to_string()))
        }
        "output.stats" => {
            let flag: bool = value
                .trim()
                .parse()
                .context("Value must be 'true' or 'false'")?;
            Ok(toml::Value::Boolean(flag))
        }
        _ => anyhow::bail!(
            "Unknown configuration key '{}' (known keys: {})",
            key,
            KNOWN_KEYS.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_value_types() {
        assert_eq!(
            parse_config_value("scan.workers", "8").unwrap(),
            toml::Value::Integer(8)
        );
        assert_eq!(
            parse_config_value("scan.max_hash_size", "50MiB").unwrap(),
            toml::Value::Integer(52_428_800)
        );
        assert_eq!(
            parse_config_value("scan.algorithm", "SHA256").unwrap(),
            toml::Value::String("sha256".into())
        );
        assert_eq!(
            parse_config_value("output.format", "jsonl").unwrap(),
            toml::Value::String("json".into())
        );
        assert_eq!(
            parse_config_value("output.stats", "true").unwrap(),
            toml::Value::Boolean(true)
        );
    }

    #[test]
    fn test_parse_config_value_rejects_bad_input() {
        assert!(parse_config_value("scan.workers", "0").is_err());
        assert!(parse_config_value("scan.workers", "many").is_err());
        assert!(parse_config_value("scan.max_hash_size", "0").is_err());
        assert!(parse_config_value("scan.algorithm", "md4").is_err());
        assert!(parse_config_value("scan.exclude", "(").is_err());
        assert!(parse_config_value("output.stats", "yes please").is_err());
        assert!(parse_config_value("network.timeout", "5").is_err());
    }

    #[test]
    fn test_empty_exclude_is_accepted() {
        assert_eq!(
            parse_config_value("scan.exclude", "").unwrap(),
            toml::Value::String(String::new())
        );
    }
}
