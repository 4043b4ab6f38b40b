//! Catalog export to JSON files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use shipyard_core::outfit::OutfitRecord;
use shipyard_core::ship::ShipRecord;
use shipyard_core::variant::VariantShip;
use shipyard_core::Catalog;

use crate::error::{ToolError, ToolResult};

/// File names written for each plugin.
pub const SHIPS_FILE: &str = "ships.json";
/// Resolved variants.
pub const VARIANTS_FILE: &str = "variants.json";
/// Outfits.
pub const OUTFITS_FILE: &str = "outfits.json";
/// Everything, with plugin metadata.
pub const COMPLETE_FILE: &str = "complete.json";

/// JSON layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// Indented output.
    #[default]
    Pretty,
    /// Single-line output.
    Compact,
}

#[derive(Serialize)]
struct CompleteDocument<'a> {
    plugin: &'a str,
    source: String,
    ships: &'a [ShipRecord],
    variants: &'a [VariantShip],
    outfits: &'a [OutfitRecord],
}

/// Write the catalog files for one plugin into `output/name/`.
///
/// Returns the directory written to.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be written.
pub fn write_catalog(
    catalog: &Catalog,
    name: &str,
    source: &Path,
    output: &Path,
    style: JsonStyle,
) -> ToolResult<PathBuf> {
    let dir = output.join(name);
    std::fs::create_dir_all(&dir).map_err(|e| ToolError::io(&dir, e))?;

    write_json(&dir.join(SHIPS_FILE), &catalog.ships, style)?;
    write_json(&dir.join(VARIANTS_FILE), &catalog.variants, style)?;
    write_json(&dir.join(OUTFITS_FILE), &catalog.outfits, style)?;

    let complete = CompleteDocument {
        plugin: name,
        source: source.display().to_string(),
        ships: &catalog.ships,
        variants: &catalog.variants,
        outfits: &catalog.outfits,
    };
    write_json(&dir.join(COMPLETE_FILE), &complete, style)?;

    tracing::info!("Wrote catalog for {name} to {}", dir.display());
    Ok(dir)
}

/// Serialize `value` with the given style.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T, style: JsonStyle) -> serde_json::Result<String> {
    match style {
        JsonStyle::Pretty => serde_json::to_string_pretty(value),
        JsonStyle::Compact => serde_json::to_string(value),
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, style: JsonStyle) -> ToolResult<()> {
    let json = to_json(value, style).map_err(|source| ToolError::Json {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(path, json).map_err(|e| ToolError::io(path, e))
}
