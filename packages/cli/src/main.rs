#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for the fieldmap site.
//!
//! Starts the server, lists the registered maps, prints legends and checks
//! that every map's data loads and classifies.

mod check;

use clap::{Parser, Subcommand};
use fieldmap_classify::registry as classifiers;
use fieldmap_maps::registry;

/// Fieldmap site tools.
#[derive(Parser)]
#[command(name = "fieldmap")]
#[command(about = "Serve and inspect the fieldmap site")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Start the API and static file server.
    Serve,

    /// List registered maps and their properties.
    Maps,

    /// Print the legend HTML for a map property.
    Legend {
        /// Map id.
        map: String,

        /// Property key. Defaults to the map's initial property.
        #[arg(long)]
        property: Option<String>,
    },

    /// Load every map and verify its properties classify.
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(fieldmap_server::run_server())
            })
            .await??;
        }
        Commands::Maps => list_maps(),
        Commands::Legend { map, property } => print_legend(&map, property.as_deref())?,
        Commands::Check => check::run().await?,
    }

    Ok(())
}

fn list_maps() {
    for map in registry::all_maps() {
        println!("{} ({}) - {}", map.id, map.kind.label(), map.name);
        let default = map.initial_property().map(|p| p.key.as_str());
        for property in &map.properties {
            let marker = if Some(property.key.as_str()) == default {
                "*"
            } else {
                " "
            };
            println!(
                "  {marker} {:<12} {:<20} [{}]",
                property.key, property.label, property.classifier
            );
        }
    }
}

fn print_legend(id: &str, property: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let map = registry::map(id)?;
    let layer = match property {
        Some(key) => map.property(key),
        None => map.initial_property(),
    }
    .ok_or_else(|| format!("Map '{id}' has no property {}", property.unwrap_or("(default)")))?;

    let spec = classifiers::classifier(&layer.classifier)
        .ok_or_else(|| format!("Unknown classifier '{}'", layer.classifier))?;

    println!(
        "{}",
        fieldmap_render::legend::build_legend(&spec, Some(&layer.label)).into_string()
    );
    Ok(())
}
