//! Static traversal metadata: [`PathData`] (mover side) and
//! [`PathCategory`] (map side).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::movement::MovementTile;

/// How a mover traverses tiles of one category.
///
/// Loaded once and shared read-only by every mover configured with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    category: String,
    cost: f64,
    blocking: bool,
    #[serde(default)]
    movements: BTreeSet<MovementTile>,
}

impl PathData {
    pub fn new(
        category: &str,
        cost: f64,
        blocking: bool,
        movements: impl IntoIterator<Item = MovementTile>,
    ) -> Self {
        Self {
            category: category.to_string(),
            cost,
            blocking,
            movements: movements.into_iter().collect(),
        }
    }

    /// Category allowing the eight moves at `cost`, not blocking.
    pub fn walkable(category: &str, cost: f64) -> Self {
        Self::new(category, cost, false, MovementTile::DIRECTIONS)
    }

    /// Blocking category with no allowed moves.
    pub fn blocking(category: &str) -> Self {
        Self::new(category, 0.0, true, [])
    }

    pub fn name(&self) -> &str {
        &self.category
    }

    /// Cost of traversing one tile of the category.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    pub fn is_movement_allowed(&self, movement: MovementTile) -> bool {
        self.movements.contains(&movement)
    }

    pub fn movements(&self) -> impl Iterator<Item = MovementTile> + '_ {
        self.movements.iter().copied()
    }
}

/// Map-side category: a name attached to one or more tile groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCategory {
    name: String,
    groups: Vec<String>,
}

impl PathCategory {
    pub fn new<S: Into<String>>(name: &str, groups: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.to_string(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_movements() {
        let data = PathData::new("road", 1.5, false, [MovementTile::Up, MovementTile::Down]);
        assert_eq!(data.name(), "road");
        assert_eq!(data.cost(), 1.5);
        assert!(!data.is_blocking());
        assert!(data.is_movement_allowed(MovementTile::Up));
        assert!(!data.is_movement_allowed(MovementTile::Left));
        assert_eq!(data.movements().count(), 2);
    }

    #[test]
    fn presets() {
        let ground = PathData::walkable("ground", 1.0);
        assert!(MovementTile::DIRECTIONS.iter().all(|m| ground.is_movement_allowed(*m)));
        assert!(!ground.is_movement_allowed(MovementTile::None));

        let wall = PathData::blocking("wall");
        assert!(wall.is_blocking());
        assert_eq!(wall.movements().count(), 0);
    }

    #[test]
    fn category_groups() {
        let cat = PathCategory::new("ground", ["grass", "sand"]);
        assert_eq!(cat.name(), "ground");
        assert_eq!(cat.groups(), ["grass".to_string(), "sand".to_string()]);
    }
}
