//! gen-placeholder-glbs - placeholder model generator
//!
//! Encodes the literal mesh tables of a manifest (default placeholders.toml)
//! into GLB files that stand in for real art during development.
//!
//! Usage:
//!   cargo run -p gen-placeholder-glbs -- build tools/gen-placeholder-glbs/placeholders.toml

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

mod manifest;

#[derive(Parser)]
#[command(name = "gen-placeholder-glbs")]
#[command(about = "Generate placeholder GLB models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every GLB listed in a manifest
    Build {
        /// Path to placeholders.toml manifest
        #[arg(default_value = "placeholders.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without writing
    Check {
        /// Path to placeholders.toml manifest
        #[arg(default_value = "placeholders.toml")]
        manifest: PathBuf,
    },

    /// Print the layout of an existing GLB
    Inspect {
        /// Input GLB file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building placeholders from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            let built = manifest::build_all(&config, output.as_deref())?;
            if verbose {
                for file in &built {
                    tracing::info!("  {} <- mesh '{}'", file.path.display(), file.mesh);
                }
            }
            let total: usize = built.iter().map(|f| f.bytes).sum();
            tracing::info!(
                "Generated {} GLB files from {} meshes ({} bytes)",
                built.len(),
                config.meshes.len(),
                total
            );
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Inspect { input } => {
            let bytes = fs::read(&input).with_context(|| format!("Failed to read {:?}", input))?;
            let summary = glb_encoder::inspect_glb(&bytes)
                .with_context(|| format!("Failed to inspect {:?}", input))?;
            print!("{summary}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    /// The shipped manifest must stay valid
    const SHIPPED_MANIFEST: &str = include_str!("../placeholders.toml");

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_defaults() {
        let cli = Cli::parse_from(["gen-placeholder-glbs", "build"]);
        match cli.command {
            Commands::Build {
                manifest,
                output,
                verbose,
            } => {
                assert_eq!(manifest, PathBuf::from("placeholders.toml"));
                assert!(output.is_none());
                assert!(!verbose);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_shipped_manifest_is_valid() {
        let config = manifest::parse_manifest(SHIPPED_MANIFEST).unwrap();
        manifest::validate(&config).unwrap();

        let files: usize = config
            .meshes
            .iter()
            .map(|(name, entry)| entry.output_files(name).len())
            .sum();
        assert_eq!(files, 5);
        assert!(config.meshes["book"].material.is_some());
    }

    #[test]
    fn test_shipped_manifest_builds() {
        let dir = tempfile::tempdir().unwrap();
        let config = manifest::parse_manifest(SHIPPED_MANIFEST).unwrap();
        let built = manifest::build_all(&config, Some(dir.path())).unwrap();

        for file in &built {
            let bytes = fs::read(&file.path).unwrap();
            let summary = glb_encoder::inspect_glb(&bytes).unwrap();
            assert_eq!(summary.total_length as usize, bytes.len());
        }
        assert!(dir.path().join("futuristic-knight.glb").exists());
        assert!(dir.path().join("enchanted-book.glb").exists());
    }
}
