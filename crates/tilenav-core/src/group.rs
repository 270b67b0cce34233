//! Tile group lookup.

use std::collections::HashMap;

use crate::map::Tile;

/// Maps tile numbers to named groups.
///
/// Path categories and collision groups are attached to group names, not
/// to individual tile numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapTileGroup {
    groups: HashMap<u32, String>,
}

impl MapTileGroup {
    /// Create an empty group table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign every number in `numbers` to `group`.
    pub fn add_group(&mut self, group: &str, numbers: impl IntoIterator<Item = u32>) {
        for n in numbers {
            self.groups.insert(n, group.to_string());
        }
    }

    /// Builder form of [`add_group`](Self::add_group).
    pub fn with_group(mut self, group: &str, numbers: impl IntoIterator<Item = u32>) -> Self {
        self.add_group(group, numbers);
        self
    }

    /// Group name of a tile number.
    pub fn group_of(&self, number: u32) -> Option<&str> {
        self.groups.get(&number).map(String::as_str)
    }

    /// Group name of a tile.
    pub fn group(&self, tile: &Tile) -> Option<&str> {
        self.group_of(tile.number())
    }

    /// Whether a group with that name has at least one tile number.
    pub fn contains_group(&self, group: &str) -> bool {
        self.groups.values().any(|g| g == group)
    }
}
