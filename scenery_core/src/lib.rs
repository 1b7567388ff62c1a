//! Core model for scene background variations.
//!
//! A scene carries one default background plus any number of alternate images.
//! The GM picks which image they see and which image players see; this crate
//! owns the persisted shape of that choice, the editing rows used to build it,
//! the directory scan that proposes new variations, and the per-role display
//! resolution. Everything here is free of host I/O so the host adapter can feed
//! it typed payloads.

pub mod rows;
pub mod scanner;
pub mod selector;
pub mod store;
pub mod variation;

pub use rows::{EditRow, RowId, VariationRows};
pub use scanner::{file_stem, scan};
pub use selector::{apply, resolve, Canvas, ViewerRole};
pub use store::{commit, ValidationError};
pub use variation::{Selection, Variation, VariationSet};

/// Namespace of the scene flag that stores a [`VariationSet`].
pub const FLAG_SCOPE: &str = "scenery";

/// Key of the scene flag that stores a [`VariationSet`].
pub const FLAG_KEY: &str = "data";
