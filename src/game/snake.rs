use std::collections::{HashSet, VecDeque};

/// The chain of body segments, head first, as flat cell indices
///
/// Occupancy is kept in a registry next to the chain so collision checks do
/// not have to walk the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    segments: VecDeque<usize>,
    occupied: HashSet<usize>,
}

impl Snake {
    /// Create a snake of a single segment
    pub fn new(head: usize) -> Self {
        Self {
            segments: VecDeque::from([head]),
            occupied: HashSet::from([head]),
        }
    }

    /// Append a segment after the current tail
    ///
    /// Returns false, leaving the chain untouched, if a segment already sits
    /// on `cell`.
    pub fn attach_child(&mut self, cell: usize) -> bool {
        if !self.occupied.insert(cell) {
            return false;
        }
        self.segments.push_back(cell);
        true
    }

    /// Shift the chain one cell forward: the head takes `target` and every
    /// other segment takes its predecessor's previous cell.
    ///
    /// Returns the cell vacated by the tail.
    pub fn advance(&mut self, target: usize) -> usize {
        self.segments.push_front(target);
        // The chain always holds the head pushed above plus at least one more.
        let vacated = self.segments.pop_back().unwrap_or(target);

        self.occupied.remove(&vacated);
        self.occupied.insert(target);
        vacated
    }

    pub fn head(&self) -> usize {
        self.segments[0]
    }

    pub fn tail(&self) -> usize {
        self.segments[self.segments.len() - 1]
    }

    /// Segments from head to tail
    pub fn segments(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().copied()
    }

    pub fn occupies(&self, cell: usize) -> bool {
        self.occupied.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a snake keeps its head for the whole game
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
