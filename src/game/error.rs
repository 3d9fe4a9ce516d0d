use std::path::PathBuf;

/// Errors raised while building a grid from its configuration
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("grid must be at least {min}x{min} cells, got {size}x{size}")]
    GridTooSmall { size: usize, min: usize },

    #[error("grid must be at most {max}x{max} cells, got {size}x{size}")]
    GridTooLarge { size: usize, max: usize },

    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f32),

    #[error("move interval must be positive")]
    InvalidInterval,

    #[error("canvas {width}x{height} leaves no room for a {grid_size}x{grid_size} grid")]
    CanvasTooSmall {
        width: f32,
        height: f32,
        grid_size: usize,
    },

    #[error("failed to read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
