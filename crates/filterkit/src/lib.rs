#![forbid(unsafe_code)]

//! filterkit public facade crate.
//!
//! Re-exports the common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.

// --- Layout re-exports -----------------------------------------------------

pub use filterkit_layout::{
    Anchor, PlacementQuery, PlacementResult, PositionStyle, TriggerGeometry, resolve,
    resolve_or_neutral,
};

// --- Runtime re-exports ----------------------------------------------------

pub use filterkit_runtime::{
    CallbackKind, ConfigError, ConfigLoadError, Debouncer, EditOutcome, FieldValue, FilterConfig,
    FilterController, FilterControllerBuilder, FilterMode, FilterValues, InvalidStateError,
};

// --- Widget re-exports -----------------------------------------------------

pub use filterkit_widgets::{FilterSubmission, KeywordFilter, KeywordFilterConfig, Presentation};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Anchor, EditOutcome, FieldValue, FilterController, FilterMode, FilterSubmission,
        FilterValues, KeywordFilter, KeywordFilterConfig, PlacementQuery, PositionStyle,
        Presentation,
    };

    pub use crate::{layout, runtime, widgets};
}

pub use filterkit_layout as layout;
pub use filterkit_runtime as runtime;
pub use filterkit_widgets as widgets;
