use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::currency::{CurrencyCode, LocaleConfig};
use crate::errors::{Result, StatementError};
use crate::statement::ResultMarkers;
use crate::storage::{tmp_path, write_atomic};
use crate::utils::paths::{ensure_dir, PathResolver};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Prefix of revenue natures, matched case-insensitively.
    pub revenue_marker: String,
    pub expense_marker: String,
    /// Forest loaded at shell startup instead of the sample statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Print the statement after every change in the shell.
    pub render_on_change: bool,
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        let markers = ResultMarkers::default();
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            revenue_marker: markers.revenue,
            expense_marker: markers.expense,
            data_file: None,
            render_on_change: true,
            plain_output: false,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 7] = [
        "locale",
        "currency",
        "revenue_marker",
        "expense_marker",
        "data_file",
        "render_on_change",
        "plain_output",
    ];

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::for_tag(&self.locale)
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.clone())
    }

    pub fn markers(&self) -> ResultMarkers {
        ResultMarkers {
            revenue: self.revenue_marker.clone(),
            expense: self.expense_marker.clone(),
        }
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "locale" => self.locale = non_empty(key, value)?,
            "currency" => self.currency = non_empty(key, value)?.to_ascii_uppercase(),
            "revenue_marker" => self.revenue_marker = non_empty(key, value)?,
            "expense_marker" => self.expense_marker = non_empty(key, value)?,
            "data_file" => {
                self.data_file = match value.trim() {
                    "" | "none" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            "render_on_change" => self.render_on_change = parse_flag(key, value)?,
            "plain_output" => self.plain_output = parse_flag(key, value)?,
            other => {
                return Err(StatementError::Config(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Current value of a setting as shown by `config show`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "revenue_marker" => self.revenue_marker.clone(),
            "expense_marker" => self.expense_marker.clone(),
            "data_file" => self
                .data_file
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "none".into()),
            "render_on_change" => self.render_on_change.to_string(),
            "plain_output" => self.plain_output.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StatementError::Config(format!("`{key}` cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(StatementError::Config(format!(
            "`{key}` expects on/off, got `{other}`"
        ))),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            debug!(path = %self.path.display(), "No config file; using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
