use std::collections::VecDeque;

use tilenav_core::CoordTile;

/// Ordered tile steps from a source tile to a destination tile, both
/// included.
///
/// Paths are built backward from the goal, so steps are prepended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    steps: VecDeque<CoordTile>,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a step before the current first step.
    pub fn prepend_step(&mut self, x: i32, y: i32) {
        self.steps.push_front(CoordTile::new(x, y));
    }

    /// Append a step after the current last step.
    pub fn append_step(&mut self, x: i32, y: i32) {
        self.steps.push_back(CoordTile::new(x, y));
    }

    /// Step at `index`, if any.
    pub fn step(&self, index: usize) -> Option<CoordTile> {
        self.steps.get(index).copied()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> Option<CoordTile> {
        self.steps.front().copied()
    }

    pub fn last(&self) -> Option<CoordTile> {
        self.steps.back().copied()
    }

    /// Whether `(x, y)` is one of the steps.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.steps.contains(&CoordTile::new(x, y))
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Steps in order; this is what a debug renderer reads.
    pub fn iter(&self) -> impl Iterator<Item = CoordTile> + '_ {
        self.steps.iter().copied()
    }
}

impl FromIterator<CoordTile> for Path {
    fn from_iter<I: IntoIterator<Item = CoordTile>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_builds_in_order() {
        let mut path = Path::new();
        path.prepend_step(2, 2);
        path.prepend_step(1, 1);
        path.prepend_step(0, 0);
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some(CoordTile::new(0, 0)));
        assert_eq!(path.last(), Some(CoordTile::new(2, 2)));
        assert_eq!(path.step(1), Some(CoordTile::new(1, 1)));
        assert_eq!(path.step(3), None);
        assert!(path.contains(1, 1));
        assert!(!path.contains(1, 0));
    }

    #[test]
    fn clear_empties() {
        let mut path: Path = [CoordTile::new(0, 0), CoordTile::new(0, 1)].into_iter().collect();
        path.append_step(0, 2);
        assert_eq!(path.iter().count(), 3);
        path.clear();
        assert!(path.is_empty());
        assert_eq!(path.first(), None);
    }
}
