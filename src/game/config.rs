use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::GameError;

/// Smallest grid that still has an interior cell to spawn the head on
pub const MIN_GRID_SIZE: usize = 3;

/// Largest grid accepted; keeps the cell table a few megabytes at most
pub const MAX_GRID_SIZE: usize = 512;

/// Geometry and pacing of a game
///
/// Everything the core needs to know about the host display is passed in here
/// at construction; nothing is read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cells along each side of the square grid
    pub grid_size: usize,
    /// Side length of one cell in canvas units
    pub cell_size: f32,
    /// Horizontal offset of the grid's left edge
    pub x_margin: f32,
    /// Vertical offset of the grid's top edge
    pub y_margin: f32,
    /// Minimum time between two moves, in milliseconds
    pub move_interval_ms: u64,
    /// Seed for food placement; entropy is used when absent
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            cell_size: 20.0,
            x_margin: 100.0,
            y_margin: 100.0,
            move_interval_ms: 200,
            seed: None,
        }
    }
}

impl GridConfig {
    /// Create a configuration with a custom grid size and default geometry
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Size the cells so the grid fills a canvas vertically, minus `y_margin`
    /// above and below, and centre it horizontally.
    pub fn fit_canvas(
        width: f32,
        height: f32,
        grid_size: usize,
        y_margin: f32,
    ) -> Result<Self, GameError> {
        check_grid_size(grid_size)?;

        let cell_size = (height - 2.0 * y_margin) / grid_size as f32;
        let x_margin = (width - cell_size * grid_size as f32) / 2.0;
        if cell_size <= 0.0 || x_margin < 0.0 {
            return Err(GameError::CanvasTooSmall {
                width,
                height,
                grid_size,
            });
        }

        Ok(Self {
            grid_size,
            cell_size,
            x_margin,
            y_margin,
            ..Default::default()
        })
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&json).map_err(|source| GameError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    pub fn validate(&self) -> Result<(), GameError> {
        check_grid_size(self.grid_size)?;
        if self.cell_size.is_nan() || self.cell_size <= 0.0 {
            return Err(GameError::InvalidCellSize(self.cell_size));
        }
        if self.move_interval_ms == 0 {
            return Err(GameError::InvalidInterval);
        }
        Ok(())
    }
}

fn check_grid_size(size: usize) -> Result<(), GameError> {
    if size < MIN_GRID_SIZE {
        return Err(GameError::GridTooSmall {
            size,
            min: MIN_GRID_SIZE,
        });
    }
    if size > MAX_GRID_SIZE {
        return Err(GameError::GridTooLarge {
            size,
            max: MAX_GRID_SIZE,
        });
    }
    Ok(())
}
