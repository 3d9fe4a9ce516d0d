//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Drawing goes through the [`Canvas`] trait and time comes in as plain
//! millisecond timestamps, so any front end can drive it.

pub mod canvas;
pub mod cell;
pub mod clock;
pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod snake;

// Re-export commonly used types
pub use canvas::{Canvas, Paint};
pub use cell::Cell;
pub use clock::{Clock, MonotonicClock};
pub use config::{GridConfig, MAX_GRID_SIZE, MIN_GRID_SIZE};
pub use direction::Direction;
pub use error::GameError;
pub use grid::{Collision, GameStatus, Grid, StepOutcome, TickOutcome};
pub use snake::Snake;
