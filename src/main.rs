use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake::game::GridConfig;
use grid_snake::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a fixed square grid")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON file with a grid configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells along each side of the grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// Side length of one cell in canvas units
    #[arg(long)]
    cell_size: Option<f32>,

    /// Margin above and below the grid
    #[arg(long)]
    y_margin: Option<f32>,

    /// Canvas width; with --canvas-height, derives cell size and horizontal margin
    #[arg(long, requires = "canvas_height")]
    canvas_width: Option<f32>,

    /// Canvas height; with --canvas-width, derives cell size and horizontal margin
    #[arg(long, requires = "canvas_width")]
    canvas_height: Option<f32>,

    /// Milliseconds between two moves
    #[arg(long)]
    interval: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
}

impl Cli {
    fn grid_config(&self) -> Result<GridConfig> {
        let mut config = match &self.config {
            Some(path) => GridConfig::from_json_file(path)?,
            None => GridConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(y_margin) = self.y_margin {
            config.y_margin = y_margin;
        }
        if let (Some(width), Some(height)) = (self.canvas_width, self.canvas_height) {
            let fitted = GridConfig::fit_canvas(width, height, config.grid_size, config.y_margin)?;
            config.cell_size = fitted.cell_size;
            config.x_margin = fitted.x_margin;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(interval) = self.interval {
            config.move_interval_ms = interval;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

/// The terminal owns stderr while the game runs, so logs only go to a file
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_deref())?;

    let config = cli.grid_config().context("Invalid grid configuration")?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "grid_snake",
            "--grid-size",
            "12",
            "--interval",
            "150",
            "--seed",
            "3",
        ]);
        let config = cli.grid_config().unwrap();

        assert_eq!(config.grid_size, 12);
        assert_eq!(config.move_interval_ms, 150);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_canvas_fitting() {
        let cli = Cli::parse_from([
            "grid_snake",
            "--canvas-width",
            "1000",
            "--canvas-height",
            "600",
        ]);
        let config = cli.grid_config().unwrap();

        assert_eq!(config.cell_size, 20.0);
        assert_eq!(config.x_margin, 300.0);
    }

    #[test]
    fn test_canvas_width_requires_height() {
        assert!(Cli::try_parse_from(["grid_snake", "--canvas-width", "1000"]).is_err());
    }

    #[test]
    fn test_invalid_grid_size() {
        let cli = Cli::parse_from(["grid_snake", "--grid-size", "2"]);
        assert!(cli.grid_config().is_err());
    }
}
