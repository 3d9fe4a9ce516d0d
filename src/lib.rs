//! Grid Snake - the classic Snake game on a fixed square grid
//!
//! This library provides:
//! - Core game logic with no I/O (game module)
//! - Terminal rendering through the game's canvas trait (render module)
//! - Keyboard mapping (input module)
//! - The interactive session loop (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
