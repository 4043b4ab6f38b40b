//! # Shipyard Tools
//!
//! IO layer around `shipyard_core`:
//! - Local data tree loading
//! - RON plugin manifests
//! - JSON catalog export
//! - Parallel batch processing

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod batch;
pub mod error;
pub mod export;
pub mod manifest;
pub mod sources;

pub use error::{ToolError, ToolResult};
