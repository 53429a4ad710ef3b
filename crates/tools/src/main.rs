use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use formats::{StatTable, load_feature_collection, load_stat_table};
use layers::{ChoroplethBuild, ChoroplethLayer};
use tools::{ObjOptions, ToolConfig, format_report, write_obj};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and export the extruded prefecture map")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct Inputs {
    /// Prefecture boundaries (GeoJSON FeatureCollection)
    geojson: PathBuf,
    /// Statistics JSON; built-in population figures when omitted
    #[arg(long)]
    stats: Option<PathBuf>,
    /// Choropleth and view settings (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print per-feature values, heights and hues plus the build report
    Inspect {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Write the composed map as Wavefront OBJ
    ExportObj {
        #[command(flatten)]
        inputs: Inputs,
        /// Output .obj path
        out: PathBuf,
        /// Skip outline edges
        #[arg(long)]
        no_edges: bool,
    },
    /// Print the default configuration as JSON
    DefaultConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .init();

    match cli.cmd {
        Command::Inspect { inputs } => {
            let (_, build) = build_map(&inputs)?;
            print!("{}", format_report(&build));
        }
        Command::ExportObj {
            inputs,
            out,
            no_edges,
        } => {
            let (cfg, build) = build_map(&inputs)?;
            let file = fs::File::create(&out)
                .with_context(|| format!("create {}", out.display()))?;
            let stats = write_obj(
                &build.group,
                cfg.choropleth.edge_rgb(),
                ObjOptions { edges: !no_edges },
                BufWriter::new(file),
            )
            .with_context(|| format!("write {}", out.display()))?;
            tracing::info!(
                path = %out.display(),
                vertices = stats.vertices,
                faces = stats.faces,
                lines = stats.lines,
                "wrote obj"
            );
        }
        Command::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&ToolConfig::default())?);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ToolConfig> {
    let Some(path) = path else {
        return Ok(ToolConfig::default());
    };
    let payload =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    ToolConfig::from_json_str(&payload).with_context(|| format!("parse config {}", path.display()))
}

fn build_map(inputs: &Inputs) -> Result<(ToolConfig, ChoroplethBuild)> {
    let cfg = load_config(inputs.config.as_deref())?;
    let collection = load_feature_collection(&inputs.geojson)?;
    let stats = match &inputs.stats {
        Some(path) => load_stat_table(path)?,
        None => StatTable::japan_defaults(),
    };

    let build = ChoroplethLayer::new(1, cfg.choropleth.clone())
        .build(&collection, &stats, &cfg.view)
        .with_context(|| format!("build map from {}", inputs.geojson.display()))?;
    Ok((cfg, build))
}
