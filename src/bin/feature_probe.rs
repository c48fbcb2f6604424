//! Probes a captured host profile and prints the results.
//!
//! `flags` emits the registry as a JSON object, `markers` prints the marker
//! list after aggregation and `report` prints the human-readable support
//! summary. Extension files are applied after the built-in probes, in the
//! order given.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use featureprobe::{
    MarkerList, Registry, Report, load_extensions_from_path, load_profile_from_path,
    resolve_extension_paths, resolve_profile_path,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feature-probe", version, about = "Run capability probes against a host profile")]
struct Cli {
    /// Host profile JSON (falls back to FEATURE_PROFILE).
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Extension file to apply after the built-in probes; repeatable
    /// (falls back to FEATURE_EXTENSIONS).
    #[arg(long = "extend", global = true)]
    extensions: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every flag as a JSON object, in registry order.
    Flags {
        /// Only list the names of supported flags.
        #[arg(long)]
        supported: bool,
    },
    /// Aggregate supported flags into a marker list and print it.
    Markers {
        /// Existing marker list to append to.
        #[arg(long, default_value = "")]
        initial: String,
        /// Number of aggregation passes; each pass appends again.
        #[arg(long, default_value_t = 1)]
        passes: usize,
    },
    /// Print the support report.
    Report,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let registry = build_registry(&cli)?;

    match cli.command {
        Command::Flags { supported } => {
            if supported {
                let supported: Vec<&str> = registry
                    .flags()
                    .filter(|flag| flag.value)
                    .map(|flag| flag.name.as_str())
                    .collect();
                println!("{}", serde_json::to_string_pretty(&supported)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&registry)?);
            }
        }
        Command::Markers { initial, passes } => {
            let mut markers = MarkerList::from_existing(initial);
            for _ in 0..passes {
                registry.apply_markers(&mut markers);
            }
            println!("{}", markers.as_str().trim_start());
        }
        Command::Report => {
            println!("{}", Report::from_registry(&registry));
        }
    }
    Ok(())
}

fn build_registry(cli: &Cli) -> Result<Registry> {
    let profile_path = resolve_profile_path(cli.profile.as_deref())?;
    let host = load_profile_from_path(&profile_path)?;
    info!(profile = %profile_path.display(), "probing host profile");
    let mut registry = Registry::initialize(host);

    for path in resolve_extension_paths(&cli.extensions) {
        let extensions = load_extensions_from_path(&path)?;
        registry
            .apply_extensions(&extensions)
            .with_context(|| format!("applying extensions from {}", path.display()))?;
    }
    Ok(registry)
}
