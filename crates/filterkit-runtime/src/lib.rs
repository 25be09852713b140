#![forbid(unsafe_code)]

//! filterkit Runtime
//!
//! This crate owns the stateful half of a filter widget: the values a user is
//! editing, whether they diverge from what the host last committed, and when
//! the host should hear about it.
//!
//! # Key Components
//!
//! - [`FilterController`] - Live-edit / explicit-submit lifecycle of a filter form
//! - [`Debouncer`] - Trailing-edge single-shot deadline driven by injected time
//! - [`FilterValues`] - Field name to [`FieldValue`] mapping
//! - [`FilterConfig`] - Construction settings, loadable from env/TOML/JSON
//!
//! # How it fits in the system
//! The rendering layer forwards edits into the controller and drives
//! [`FilterController::tick`] from its event loop. The host receives values
//! through injected callbacks and feeds committed values back with
//! [`FilterController::reinitialize`].

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod values;

pub use config::{
    ConfigLoadError, DEFAULT_DEBOUNCE_WINDOW_MS, FilterConfig, FilterMode,
    MAX_DEBOUNCE_WINDOW_MS,
};
pub use controller::{EditOutcome, FilterController, FilterControllerBuilder};
pub use debounce::Debouncer;
pub use error::{CallbackKind, ConfigError, InvalidStateError};
pub use values::{FieldValue, FilterValues};
