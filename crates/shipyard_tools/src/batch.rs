//! Batch processing of plugins.
//!
//! Each plugin is loaded, assembled and exported on its own. Plugins run in
//! parallel and a failing plugin does not stop the others.

use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;
use shipyard_core::{Assembler, Catalog, ScanSummary};

use crate::error::ToolResult;
use crate::export::{write_catalog, JsonStyle};
use crate::manifest::{Manifest, Plugin};
use crate::sources::load_data_files;

/// Outcome of one successful plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginReport {
    /// Plugin name.
    pub name: String,
    /// Assembly counters.
    pub summary: ScanSummary,
}

/// A plugin that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginFailure {
    /// Plugin name.
    pub name: String,
    /// Error message.
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Plugins written, in manifest order.
    pub succeeded: Vec<PluginReport>,
    /// Plugins that failed, in manifest order.
    pub failed: Vec<PluginFailure>,
}

impl BatchReport {
    /// Check if every plugin succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Load and assemble one plugin without writing anything.
///
/// # Errors
///
/// Returns an error if the plugin's source tree cannot be read.
pub fn assemble_plugin(plugin: &Plugin) -> ToolResult<(Catalog, ScanSummary)> {
    let files = load_data_files(&plugin.source, plugin.data_dir())?;
    let mut assembler = Assembler::new();
    for file in &files {
        assembler.scan(&file.path, &file.text);
    }
    Ok(assembler.finish())
}

/// Load, assemble and export one plugin.
///
/// # Errors
///
/// Returns an error if the source cannot be read or the output cannot be
/// written.
pub fn process_plugin(plugin: &Plugin, output: &Path, style: JsonStyle) -> ToolResult<PluginReport> {
    tracing::info!("Processing plugin {} from {}", plugin.name, plugin.source.display());
    let (catalog, summary) = assemble_plugin(plugin)?;
    write_catalog(&catalog, &plugin.name, &plugin.source, output, style)?;
    Ok(PluginReport {
        name: plugin.name.clone(),
        summary,
    })
}

/// Process every plugin in the manifest.
#[must_use]
pub fn run_batch(manifest: &Manifest, output: &Path, style: JsonStyle) -> BatchReport {
    let results: Vec<Result<PluginReport, PluginFailure>> = manifest
        .plugins
        .par_iter()
        .map(|plugin| {
            process_plugin(plugin, output, style).map_err(|e| {
                tracing::error!("Plugin {} failed: {e}", plugin.name);
                PluginFailure {
                    name: plugin.name.clone(),
                    message: e.to_string(),
                }
            })
        })
        .collect();

    let mut report = BatchReport::default();
    for result in results {
        match result {
            Ok(done) => report.succeeded.push(done),
            Err(failure) => report.failed.push(failure),
        }
    }

    tracing::info!(
        "Batch complete: {} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
    report
}
