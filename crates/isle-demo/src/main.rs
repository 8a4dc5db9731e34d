//! Island generator command-line host.
//!
//! Loads `config.ron` (created with defaults on first run), applies CLI
//! overrides, generates one island step by step, writes the painted tilemap
//! as a PNG and prints an ASCII preview.
//!
//! Run with `cargo run -p isle-demo -- --seed Moranu --width 160 --height 120`.

mod export;
mod frame_loop;
mod session;

use std::process::ExitCode;

use clap::Parser;
use isle_config::{CliArgs, Config, ConfigError, default_config_dir};
use isle_terrain::GenerationError;
use isle_terrain::debug_viz::{ascii_preview, render_tilemap_debug};
use tracing::{error, info, warn};

use crate::export::{ExportError, write_png};
use crate::session::IslandSession;

/// Anything that can stop the demo.
#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    isle_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), DemoError> {
    config.validate()?;

    let mut session = IslandSession::new(config)?;
    let report = session.run()?;
    info!(
        "Island '{}' generated: {} points over {} ticks ({:.2}s simulated)",
        report.seed, report.total_points, report.ticks, report.sim_seconds
    );

    let generator = session.generator();
    if config.output.ascii_preview
        && let Some(field) = generator.field()
    {
        println!("{}", ascii_preview(field, config.output.preview_columns));
    }

    if let Some(histogram) = generator.sink().map(|sink| sink.visible_histogram()) {
        let mut layers: Vec<_> = histogram.into_iter().collect();
        layers.sort_unstable();
        for (index, count) in layers {
            let rule = generator
                .config()
                .layers
                .get(index)
                .map_or("?", |layer| layer.rule.as_str());
            info!(layer = index, rule, tiles = count, "visible tiles");
        }
    }

    let image = generator
        .sink()
        .and_then(render_tilemap_debug)
        .ok_or(ExportError::Empty)?
        .upscaled(config.output.pixel_scale);
    write_png(&config.output.image_path, &image)?;
    info!(
        "Wrote {}x{} image to {}",
        image.width,
        image.height,
        config.output.image_path.display()
    );

    let generator = session.generator_mut();
    match generator.edge_tile(None, None, 1) {
        Ok(cell) => {
            let (map, layer) = (cell.map_position(), cell.z_layer);
            let grid = generator.map_to_grid(map);
            info!(
                "Shore found at map ({}, {}), grid ({}, {}), layer {}",
                map.x, map.y, grid.x, grid.y, layer
            );
        }
        Err(GenerationError::OutOfBounds { x, y, min_layer }) => {
            warn!("No tile of layer {min_layer} or higher inward from grid ({x}, {y})");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
