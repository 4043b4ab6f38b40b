//! Plugin manifest loading.
//!
//! A manifest lists the plugins a batch run should process:
//!
//! ```ron
//! Manifest(
//!     plugins: [
//!         Plugin(name: "vanilla", source: "endless-sky"),
//!         Plugin(name: "my-plugin", source: "plugins/my-plugin", data_dir: Some("data")),
//!     ],
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ToolError, ToolResult};
use crate::sources::DEFAULT_DATA_DIR;

/// A list of plugins to process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Plugins in processing order.
    #[serde(default)]
    pub plugins: Vec<Plugin>,
}

/// One plugin entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Output directory name for this plugin.
    pub name: String,
    /// Plugin root directory.
    pub source: PathBuf,
    /// Name of the directory holding data files.
    #[serde(default)]
    pub data_dir: Option<String>,
}

impl Plugin {
    /// Create a plugin entry with the default data directory.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            data_dir: None,
        }
    }

    /// Data directory name, falling back to `data`.
    #[must_use]
    pub fn data_dir(&self) -> &str {
        self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }
}

/// Parse a manifest from RON text.
///
/// Relative plugin sources are resolved against `base`.
///
/// # Errors
///
/// Returns [`ToolError::Manifest`] if the text is not a valid manifest.
pub fn parse_manifest(text: &str, origin: &Path, base: &Path) -> ToolResult<Manifest> {
    let mut manifest: Manifest = ron::from_str(text).map_err(|source| ToolError::Manifest {
        path: origin.display().to_string(),
        source,
    })?;
    for plugin in &mut manifest.plugins {
        if plugin.source.is_relative() {
            plugin.source = base.join(&plugin.source);
        }
    }
    Ok(manifest)
}

/// Load a manifest file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_manifest(path: &Path) -> ToolResult<Manifest> {
    let text = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let manifest = parse_manifest(&text, path, base)?;
    tracing::info!(
        "Loaded manifest {} with {} plugins",
        path.display(),
        manifest.plugins.len()
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_defaults() {
        let text = r#"Manifest(plugins: [Plugin(name: "vanilla", source: "endless-sky")])"#;
        let manifest = parse_manifest(text, Path::new("m.ron"), Path::new("/content")).unwrap();

        assert_eq!(manifest.plugins.len(), 1);
        let plugin = &manifest.plugins[0];
        assert_eq!(plugin.source, Path::new("/content/endless-sky"));
        assert_eq!(plugin.data_dir(), "data");
    }

    #[test]
    fn test_parse_manifest_custom_data_dir() {
        let text = r#"Manifest(plugins: [
            Plugin(name: "extra", source: "/abs/extra", data_dir: Some("content")),
        ])"#;
        let manifest = parse_manifest(text, Path::new("m.ron"), Path::new("/base")).unwrap();

        let plugin = &manifest.plugins[0];
        assert_eq!(plugin.source, Path::new("/abs/extra"));
        assert_eq!(plugin.data_dir(), "content");
    }

    #[test]
    fn test_parse_manifest_error_names_file() {
        let err = parse_manifest("Manifest(plugins: [", Path::new("broken.ron"), Path::new(""))
            .unwrap_err();
        assert!(matches!(err, ToolError::Manifest { .. }));
        assert!(err.to_string().contains("broken.ron"));
    }
}
