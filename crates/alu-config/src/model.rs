use serde::{de::Deserializer, Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::ConfigError;

/// Stores operator preferences and where quotes are priced and kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub currency_precision: Option<u8>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub backend: BackendConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "fr-MA".into(),
            currency: "MAD".into(),
            currency_precision: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 9] = [
        "locale",
        "currency",
        "currency_precision",
        "ui_color_enabled",
        "backend.kind",
        "backend.base_url",
        "backend.session_cookie",
        "backend.request_timeout_secs",
        "backend.data_dir",
    ];

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn precision(&self) -> usize {
        self.currency_precision
            .map(|value| value as usize)
            .unwrap_or(2)
    }

    /// Current value of `key` as shown by `config show`. Secrets are masked.
    pub fn value_of(&self, key: &str) -> Result<String, ConfigError> {
        let unset = || "(unset)".to_string();
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "currency_precision" => self.precision().to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "backend.kind" => self.backend.kind.to_string(),
            "backend.base_url" => self.backend.base_url.clone().unwrap_or_else(unset),
            "backend.session_cookie" => match &self.backend.session_cookie {
                Some(_) => "********".into(),
                None => unset(),
            },
            "backend.request_timeout_secs" => self.backend.request_timeout_secs.to_string(),
            "backend.data_dir" => self
                .backend
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(unset),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Applies `config set <key> <value>`. An empty value clears optional keys.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional = |value: &str| {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "locale" => {
                if value.is_empty() {
                    return Err(invalid("locale cannot be empty"));
                }
                self.locale = value.to_string();
            }
            "currency" => {
                if value.is_empty() {
                    return Err(invalid("currency cannot be empty"));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "currency_precision" => {
                self.currency_precision = match value {
                    "" => None,
                    raw => Some(
                        raw.parse::<u8>()
                            .ok()
                            .filter(|digits| *digits <= 6)
                            .ok_or_else(|| invalid("expected a number between 0 and 6"))?,
                    ),
                };
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = parse_flag(value).ok_or_else(|| invalid("expected on/off"))?;
            }
            "backend.kind" => {
                self.backend.kind =
                    BackendKind::parse(value).ok_or_else(|| invalid("expected local or remote"))?;
            }
            "backend.base_url" => {
                self.backend.base_url = optional(value).map(|url| url.trim_end_matches('/').to_string());
            }
            "backend.session_cookie" => self.backend.session_cookie = optional(value),
            "backend.request_timeout_secs" => {
                self.backend.request_timeout_secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| invalid("expected a positive number of seconds"))?;
            }
            "backend.data_dir" => self.backend.data_dir = optional(value).map(PathBuf::from),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Where catalog, quotes and documents come from.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// JSON files under the data directory.
    #[default]
    Local,
    /// The quoting service at `base_url`.
    Remote,
}

impl BackendKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(BackendKind::Local),
            "remote" => Some(BackendKind::Remote),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BackendKind::Local => "local",
            BackendKind::Remote => "remote",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for BackendKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(BackendKind::parse)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
    #[serde(default = "BackendConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for local data. Defaults to `<home>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            base_url: None,
            session_cookie: None,
            request_timeout_secs: Self::default_request_timeout_secs(),
            data_dir: None,
        }
    }
}

impl BackendConfig {
    pub fn default_request_timeout_secs() -> u64 {
        30
    }

    pub fn resolve_data_dir(&self, home: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| home.join("data"))
    }
}

/// Home directory for config and local data: `ALU_CONFIGURATOR_HOME` when set,
/// else `~/.alu_configurator`.
pub fn resolve_home_dir() -> PathBuf {
    if let Some(custom) = std::env::var_os("ALU_CONFIGURATOR_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".alu_configurator")
}
