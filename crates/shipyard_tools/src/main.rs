//! Shipyard - ship, variant and outfit catalog extractor

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use shipyard_core::sprites::sprite_manifest;
use shipyard_tools::batch::{assemble_plugin, process_plugin, run_batch};
use shipyard_tools::export::{to_json, JsonStyle};
use shipyard_tools::manifest::{load_manifest, Plugin};
use shipyard_tools::sources::DEFAULT_DATA_DIR;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "shipyard")]
#[command(about = "Extract ship, variant and outfit catalogs from game data files")]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan one data tree and write its catalog files
    Parse {
        /// Plugin root directory
        source: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
        /// Catalog name (defaults to the source directory name)
        #[arg(short, long)]
        name: Option<String>,
        /// Directory name holding data files
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: String,
        /// Write single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Process every plugin in a RON manifest
    Batch {
        /// Path to manifest file
        manifest: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
        /// Write single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print the sprite manifest of a data tree as JSON
    Sprites {
        /// Plugin root directory
        source: PathBuf,
        /// Directory name holding data files
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: String,
    },
}

fn style(compact: bool) -> JsonStyle {
    if compact {
        JsonStyle::Compact
    } else {
        JsonStyle::Pretty
    }
}

fn plugin_name(source: &Path) -> String {
    source
        .canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(source)
        .file_name()
        .map_or_else(|| "plugin".to_string(), |n| n.to_string_lossy().into_owned())
}

fn fail(message: &str) -> ! {
    tracing::error!("{message}");
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    match cli.command {
        Commands::Parse {
            source,
            output,
            name,
            data_dir,
            compact,
        } => {
            let name = name.unwrap_or_else(|| plugin_name(&source));
            let plugin = Plugin {
                name,
                source,
                data_dir: Some(data_dir),
            };
            match process_plugin(&plugin, &output, style(compact)) {
                Ok(report) => {
                    let s = report.summary;
                    tracing::info!(
                        "{}: {} files, {} ships, {} variants ({} skipped), {} outfits",
                        report.name,
                        s.files,
                        s.ships,
                        s.variants,
                        s.skipped,
                        s.outfits
                    );
                }
                Err(e) => fail(&format!("Parse failed: {e}")),
            }
        }
        Commands::Batch {
            manifest,
            output,
            compact,
        } => {
            let manifest = match load_manifest(&manifest) {
                Ok(manifest) => manifest,
                Err(e) => fail(&format!("Failed to load manifest: {e}")),
            };
            let report = run_batch(&manifest, &output, style(compact));
            for done in &report.succeeded {
                tracing::info!(
                    "{}: {} ships, {} variants, {} outfits",
                    done.name,
                    done.summary.ships,
                    done.summary.variants,
                    done.summary.outfits
                );
            }
            if !report.is_success() {
                fail(&format!("{} plugins failed", report.failed.len()));
            }
        }
        Commands::Sprites { source, data_dir } => {
            let plugin = Plugin {
                name: plugin_name(&source),
                source,
                data_dir: Some(data_dir),
            };
            let catalog = match assemble_plugin(&plugin) {
                Ok((catalog, _)) => catalog,
                Err(e) => fail(&format!("Failed to load sources: {e}")),
            };
            match to_json(&sprite_manifest(&catalog), JsonStyle::Pretty) {
                Ok(json) => println!("{json}"),
                Err(e) => fail(&format!("Failed to serialize sprite manifest: {e}")),
            }
        }
    }
}
