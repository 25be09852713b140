#![forbid(unsafe_code)]

//! Placement geometry for filter popups.
//!
//! # Role in filterkit
//! `filterkit-layout` is the pure half of the workspace. It turns layout
//! measurements of a filter's trigger button and its popup content into a
//! [`PositionStyle`] directive the rendering layer applies. Nothing here
//! holds state or touches time.

pub mod placement;

pub use placement::{
    Anchor, PlacementQuery, PlacementResult, PositionStyle, TriggerGeometry, resolve,
    resolve_or_neutral,
};
