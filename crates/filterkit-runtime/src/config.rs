#![forbid(unsafe_code)]

//! Filter form configuration.
//!
//! [`FilterConfig`] captures the construction-time settings of a
//! [`FilterController`](crate::FilterController) as data, so an application
//! can keep them in a TOML or JSON file next to the rest of its settings.
//!
//! # Defaults
//!
//! | Setting | Default | Range |
//! |---------|---------|-------|
//! | `mode` | `explicit-submit` | |
//! | `use_debounce` | `false` | |
//! | `debounce_window_ms` | 600 | 0-10000 |
//! | `keep_dirty_on_reinitialize` | `false` | |
//!
//! # Environment Variables
//!
//! | Variable | Type | Description |
//! |----------|------|-------------|
//! | `FILTERKIT_LIVE_EDIT` | bool | Use live-edit mode |
//! | `FILTERKIT_USE_DEBOUNCE` | bool | Debounce live-edit changes |
//! | `FILTERKIT_DEBOUNCE_MS` | u64 | Debounce window |
//!
//! # Loading
//!
//! ```toml
//! # filters.toml
//! mode = "live-edit"
//! use_debounce = true
//! debounce_window_ms = 400
//! ```
//!
//! ```rust,ignore
//! let config = FilterConfig::from_toml_file("filters.toml")?;
//! ```

use std::fmt;
#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Default debounce window for live-edit change notifications.
pub const DEFAULT_DEBOUNCE_WINDOW_MS: u64 = 600;

/// Upper bound applied by [`FilterConfig::validated`].
pub const MAX_DEBOUNCE_WINDOW_MS: u64 = 10_000;

/// How a filter form applies its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum FilterMode {
    /// Changes apply incrementally; no submit step.
    LiveEdit,
    /// Edits are batched until submit, cancel or clear.
    #[default]
    ExplicitSubmit,
}

impl FilterMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LiveEdit => "live-edit",
            Self::ExplicitSubmit => "explicit-submit",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction-time settings for a filter controller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FilterConfig {
    pub mode: FilterMode,
    /// Only meaningful in live-edit mode.
    pub use_debounce: bool,
    pub debounce_window_ms: u64,
    /// Keep user-edited fields when the host reinitializes values.
    pub keep_dirty_on_reinitialize: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            mode: FilterMode::default(),
            use_debounce: false,
            debounce_window_ms: DEFAULT_DEBOUNCE_WINDOW_MS,
            keep_dirty_on_reinitialize: false,
        }
    }
}

impl FilterConfig {
    /// Live-edit config, optionally debounced with the default window.
    #[must_use]
    pub fn live_edit(use_debounce: bool) -> Self {
        Self {
            mode: FilterMode::LiveEdit,
            use_debounce,
            ..Self::default()
        }
    }

    /// Explicit-submit config.
    #[must_use]
    pub fn explicit_submit() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window_ms = window.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_keep_dirty_on_reinitialize(mut self, keep: bool) -> Self {
        self.keep_dirty_on_reinitialize = keep;
        self
    }

    /// Debounce window as a duration.
    #[must_use]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    /// Whether change notifications go through the debounce timer.
    #[must_use]
    pub fn debounces(&self) -> bool {
        self.mode == FilterMode::LiveEdit && self.use_debounce
    }

    /// Load config from environment variables, clamped to valid ranges.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FILTERKIT_LIVE_EDIT")
            && parse_bool(&val)
        {
            config.mode = FilterMode::LiveEdit;
        }

        if let Ok(val) = std::env::var("FILTERKIT_USE_DEBOUNCE") {
            config.use_debounce = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("FILTERKIT_DEBOUNCE_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.debounce_window_ms = ms;
        }

        config.validated()
    }

    /// Clamp the debounce window to `0..=MAX_DEBOUNCE_WINDOW_MS`.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.debounce_window_ms = self.debounce_window_ms.min(MAX_DEBOUNCE_WINDOW_MS);
        self
    }

    /// Validate parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.debounce_window_ms > MAX_DEBOUNCE_WINDOW_MS {
            errors.push(format!(
                "debounce_window_ms must be at most {MAX_DEBOUNCE_WINDOW_MS}, got {}",
                self.debounce_window_ms
            ));
        }
        if self.use_debounce && self.mode == FilterMode::ExplicitSubmit {
            errors.push("use_debounce has no effect in explicit-submit mode".to_owned());
        }
        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(s).map_err(ConfigLoadError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigLoadError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigLoadError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigLoadError::Io)?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "config")]
    fn checked(self) -> Result<Self, ConfigLoadError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigLoadError::Validation(errors))
        }
    }
}

fn parse_bool(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

/// Errors from loading a [`FilterConfig`].
#[derive(Debug)]
pub enum ConfigLoadError {
    /// File could not be read.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
