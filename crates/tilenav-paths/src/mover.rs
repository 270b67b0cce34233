use tilenav_core::{CoordTile, Range};

use crate::data::PathData;
use crate::error::PathError;
use crate::movement::MovementTile;

/// Identifier of an object occupying tiles.
pub type ObjectId = u32;

/// What the map and the search need to know about a moving object.
///
/// Category lookups follow one rule: cost is required and errors for an
/// unknown category, while blocking and movement permission fall back to
/// "not blocking" and "not allowed".
pub trait Mover {
    /// Object id, as stored in the occupancy map.
    fn id(&self) -> ObjectId;

    /// Current horizontal tile.
    fn in_tile_x(&self) -> i32;

    /// Current vertical tile.
    fn in_tile_y(&self) -> i32;

    /// Footprint width in tiles.
    fn in_tile_width(&self) -> i32 {
        1
    }

    /// Footprint height in tiles.
    fn in_tile_height(&self) -> i32 {
        1
    }

    /// Traversal data for a category, if the mover has any.
    fn path_data(&self, category: &str) -> Option<&PathData>;

    /// Whether occupants with this id never block the mover.
    fn is_ignored_id(&self, id: ObjectId) -> bool;

    fn in_tile(&self) -> CoordTile {
        CoordTile::new(self.in_tile_x(), self.in_tile_y())
    }

    /// Tiles currently covered by the mover.
    fn footprint(&self) -> Range {
        Range::footprint(self.in_tile(), self.in_tile_width(), self.in_tile_height())
    }

    fn is_blocking(&self, category: &str) -> bool {
        self.path_data(category).is_some_and(PathData::is_blocking)
    }

    fn is_movement_allowed(&self, category: &str, movement: MovementTile) -> bool {
        self.path_data(category)
            .is_some_and(|data| data.is_movement_allowed(movement))
    }

    fn cost(&self, category: &str) -> Result<f64, PathError> {
        self.path_data(category)
            .map(PathData::cost)
            .ok_or_else(|| PathError::UnknownCategory(category.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{HashMap, HashSet};

    use super::*;

    /// Bare mover used by map and search tests.
    #[derive(Debug, Clone, Default)]
    pub struct TestMover {
        pub id: ObjectId,
        pub tile: CoordTile,
        pub size: (i32, i32),
        pub data: HashMap<String, PathData>,
        pub ignored: HashSet<ObjectId>,
    }

    impl TestMover {
        pub fn new(id: ObjectId, x: i32, y: i32) -> Self {
            Self {
                id,
                tile: CoordTile::new(x, y),
                size: (1, 1),
                ..Default::default()
            }
        }

        pub fn with_data(mut self, data: PathData) -> Self {
            self.data.insert(data.name().to_string(), data);
            self
        }
    }

    impl Mover for TestMover {
        fn id(&self) -> ObjectId {
            self.id
        }
        fn in_tile_x(&self) -> i32 {
            self.tile.x
        }
        fn in_tile_y(&self) -> i32 {
            self.tile.y
        }
        fn in_tile_width(&self) -> i32 {
            self.size.0
        }
        fn in_tile_height(&self) -> i32 {
            self.size.1
        }
        fn path_data(&self, category: &str) -> Option<&PathData> {
            self.data.get(category)
        }
        fn is_ignored_id(&self, id: ObjectId) -> bool {
            self.ignored.contains(&id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::TestMover;
    use super::*;

    #[test]
    fn unknown_category_defaults() {
        let mover = TestMover::new(1, 0, 0).with_data(PathData::walkable("ground", 2.0));
        assert_eq!(mover.cost("ground").unwrap(), 2.0);
        assert!(matches!(mover.cost("lava"), Err(PathError::UnknownCategory(c)) if c == "lava"));
        assert!(!mover.is_blocking("lava"));
        assert!(!mover.is_movement_allowed("lava", MovementTile::Up));
        assert!(mover.is_movement_allowed("ground", MovementTile::Up));
    }

    #[test]
    fn footprint_follows_size() {
        let mut mover = TestMover::new(1, 2, 3);
        mover.size = (2, 2);
        assert_eq!(mover.footprint(), Range::new(2, 3, 4, 5));
    }
}
