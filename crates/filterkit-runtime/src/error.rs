#![forbid(unsafe_code)]

//! Errors raised by [`FilterController`](crate::FilterController).
//!
//! Both kinds are programmer errors. [`ConfigError`] is returned by the
//! builder before a controller exists; [`InvalidStateError`] is returned when
//! an operation is invoked in a mode that does not support it.

use std::fmt;

use crate::config::FilterMode;

/// Host callbacks a controller may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    Change,
    Submit,
    Cancel,
    Clear,
}

impl CallbackKind {
    /// Stable callback name as used in host code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Change => "on_change",
            Self::Submit => "on_submit",
            Self::Cancel => "on_cancel",
            Self::Clear => "on_clear",
        }
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The callback set is incomplete for the selected mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Mode the controller was being built for.
    pub mode: FilterMode,
    /// Every required callback that was not provided.
    pub missing: Vec<CallbackKind>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.missing.iter().map(|c| c.as_str()).collect();
        write!(
            f,
            "filter controller in {} mode requires {}",
            self.mode,
            names.join(", ")
        )
    }
}

impl std::error::Error for ConfigError {}

/// An operation was invoked in a mode that does not support it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStateError {
    /// Operation name, e.g. `"submit"`.
    pub operation: &'static str,
    /// Mode of the controller it was invoked on.
    pub mode: FilterMode,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is not available in {} mode",
            self.operation, self.mode
        )
    }
}

impl std::error::Error for InvalidStateError {}
