use super::config::GridConfig;

/// One square of the grid
///
/// Position is fixed at construction. Whether a snake segment sits here is
/// tracked by the snake itself, see [`Grid::is_occupied`](super::Grid::is_occupied).
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    index: usize,
    row: usize,
    col: usize,
    px: f32,
    py: f32,
    pub(super) is_food: bool,
}

impl Cell {
    pub fn new(index: usize, config: &GridConfig) -> Self {
        let row = index / config.grid_size;
        let col = index % config.grid_size;

        Self {
            index,
            row,
            col,
            px: col as f32 * config.cell_size + config.x_margin,
            py: row as f32 * config.cell_size + config.y_margin,
            is_food: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Top-left corner in canvas units
    pub fn coordinates(&self) -> (f32, f32) {
        (self.px, self.py)
    }

    pub fn is_food(&self) -> bool {
        self.is_food
    }
}
