#![forbid(unsafe_code)]

//! Filter widgets built on the filterkit runtime and layout crates.
//!
//! Widgets own no rendering. They hold a [`filterkit_runtime::FilterController`],
//! expose the state a view needs (label, open flag, current values) and
//! produce style directives from [`filterkit_layout`].

pub mod keyword_filter;

pub use keyword_filter::{FilterSubmission, KeywordFilter, KeywordFilterConfig, Presentation};
