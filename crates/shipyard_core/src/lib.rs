//! # Shipyard Core
//!
//! Parser for tab-indented ship and outfit data files, with variant
//! resolution.
//!
//! This crate contains **only** the parsing logic:
//! - No file system access
//! - No network access
//! - No output formatting beyond serde derives
//!
//! Input is a sequence of `(path, text)` pairs; output is a [`Catalog`] of
//! ships, resolved variants and outfits. Parsing never fails: malformed
//! records are dropped and reported through `tracing`.
//!
//! ## Crate Structure
//!
//! - [`source`] - Line and depth access for one file
//! - [`token`] - Key/value extraction for single lines
//! - [`block`] - Generic nested-block parser
//! - [`description`] - Description directive capture
//! - [`hardpoint`] - Engines, weapon mounts and bays
//! - [`ship`] - Ship records and variant declarations
//! - [`outfit`] - Outfit records
//! - [`variant`] - Variant resolution against base ships
//! - [`catalog`] - Two-pass assembly across files
//! - [`sprites`] - Sprite manifest derived from a catalog
//! - [`value`] - Attribute values and ordered maps

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod block;
pub mod catalog;
pub mod description;
pub mod hardpoint;
pub mod outfit;
pub mod ship;
pub mod source;
pub mod sprites;
pub mod token;
pub mod value;
pub mod variant;

pub use catalog::{assemble, Assembler, Catalog, ScanSummary};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{assemble, Assembler, Catalog, ScanSummary};
    pub use crate::hardpoint::{Bay, DirectedEngine, Engine, Hardpoint, HardpointKind, Hardpoints, Mount};
    pub use crate::outfit::OutfitRecord;
    pub use crate::ship::ShipRecord;
    pub use crate::sprites::{sprite_manifest, RecordKind, SpriteReference};
    pub use crate::value::{AttributeMap, Value};
    pub use crate::variant::VariantShip;
}
