use super::cell::Cell;

/// What a cell should look like on this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paint {
    Empty,
    Food,
    Snake,
}

/// Drawing surface the grid paints itself onto
///
/// Cells are painted first, then snake segments on top of them.
pub trait Canvas {
    fn fill_cell(&mut self, cell: &Cell, paint: Paint);
}
