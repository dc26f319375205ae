use crate::config::{Config, load_config};
use crate::layout::compute_positions;
use crate::layout_dump::{write_packing_dump, write_positions};
use crate::parser::parse_graph_data;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{ArgAction, Parser};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skymap", version, about = "Sky map position engine")]
pub struct Args {
    /// Input data file (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output positions file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Write the component packing (centers, radii, outer radius) as JSON
    #[arg(long = "dump")]
    pub dump: Option<PathBuf>,

    /// Write a preview image (svg, or png when built with the png feature)
    #[arg(long = "preview")]
    pub preview: Option<PathBuf>,

    /// Seed every random stage from one value
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.layout = config.layout.with_seed(seed);
    }

    let input = read_input(args.input.as_deref())?;
    let graph = parse_graph_data(&input, &config.layout.input)?;
    let positions = compute_positions(&graph, &config.layout)?;

    write_positions(&positions.map, args.output.as_deref())?;
    if let Some(path) = args.dump.as_deref() {
        write_packing_dump(path, &positions)?;
    }
    if let Some(path) = args.preview.as_deref() {
        write_preview(path, &graph, &positions, &config)?;
    }

    eprintln!(
        "positioned {} nodes: {} components (outer radius {:.1}), {} isolated, {} fallbacks",
        positions.map.len(),
        positions.components.len(),
        positions.packing.outer_radius,
        positions.isolated.len(),
        positions.fallbacks.len()
    );
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(format!("skymap_layout={default}"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_preview(
    path: &Path,
    graph: &crate::ir::Graph,
    positions: &crate::layout::Positions,
    config: &Config,
) -> Result<()> {
    let svg = render_svg(graph, positions, &config.theme, &config.layout, &config.render);
    match preview_format(path) {
        PreviewFormat::Svg => write_output_svg(&svg, path),
        PreviewFormat::Png => write_png(&svg, path, config),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreviewFormat {
    Svg,
    Png,
}

fn preview_format(path: &Path) -> PreviewFormat {
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        PreviewFormat::Png
    } else {
        PreviewFormat::Svg
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, path: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, path, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, path: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG preview requires the `png` feature: {}",
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_format_follows_extension() {
        assert_eq!(preview_format(Path::new("map.png")), PreviewFormat::Png);
        assert_eq!(preview_format(Path::new("map.PNG")), PreviewFormat::Png);
        assert_eq!(preview_format(Path::new("map.svg")), PreviewFormat::Svg);
        assert_eq!(preview_format(Path::new("map")), PreviewFormat::Svg);
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "skymap",
            "-i",
            "data.json",
            "--configFile",
            "cfg.json",
            "--seed",
            "9",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("data.json")));
        assert_eq!(args.config.as_deref(), Some(Path::new("cfg.json")));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.verbose, 2);
        assert!(args.output.is_none());
    }
}
