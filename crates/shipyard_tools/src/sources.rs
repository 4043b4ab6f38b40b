//! Local content source.
//!
//! Collects the `.txt` data files of a plugin directory tree. Only files
//! that sit below a directory named after the data directory (usually
//! `data`) are included.

use std::path::{Component, Path};

use crate::error::{ToolError, ToolResult};

/// Default name of the directory holding data files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// One data file, with its path relative to the plugin root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    /// Relative path using `/` separators.
    pub path: String,
    /// File contents.
    pub text: String,
}

/// Load every data file under `root`, sorted by relative path.
///
/// Files are read as UTF-8; invalid sequences are replaced rather than
/// rejected.
///
/// # Errors
///
/// Returns [`ToolError::MissingSource`] if `root` is not a directory, or an
/// IO error if a directory or file cannot be read.
pub fn load_data_files(root: &Path, data_dir: &str) -> ToolResult<Vec<DataFile>> {
    if !root.is_dir() {
        return Err(ToolError::MissingSource(root.display().to_string()));
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|e| ToolError::io(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ToolError::io(&dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| ToolError::io(&path, e))?;

            if file_type.is_dir() {
                pending.push(path);
                continue;
            }
            if !file_type.is_file() || !path.extension().is_some_and(|ext| ext == "txt") {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            if !in_data_dir(relative, data_dir) {
                continue;
            }

            let bytes = std::fs::read(&path).map_err(|e| ToolError::io(&path, e))?;
            files.push(DataFile {
                path: relative_name(relative),
                text: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!("Found {} data files under {}", files.len(), root.display());
    Ok(files)
}

/// Check if any parent directory of `relative` is named `data_dir`.
fn in_data_dir(relative: &Path, data_dir: &str) -> bool {
    relative
        .parent()
        .is_some_and(|parent| parent.components().any(|c| c.as_os_str() == data_dir))
}

fn relative_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_data_dir() {
        assert!(in_data_dir(Path::new("data/ships.txt"), "data"));
        assert!(in_data_dir(Path::new("plugin/data/human/ships.txt"), "data"));
        assert!(!in_data_dir(Path::new("data.txt"), "data"));
        assert!(!in_data_dir(Path::new("mydata/ships.txt"), "data"));
        assert!(in_data_dir(Path::new("content/ships.txt"), "content"));
    }

    #[test]
    fn test_relative_name_uses_forward_slashes() {
        let path: std::path::PathBuf = ["data", "human", "ships.txt"].iter().collect();
        assert_eq!(relative_name(&path), "data/human/ships.txt");
    }
}
