//! **tilenav-core**: tile map primitives shared by the pathfinding and
//! collision crates.
//!
//! This crate provides tile coordinates and ranges, the tile map query
//! surface (tile lookup, tile sizes, pixel to tile conversion), tile group
//! lookup, and the [`Transformable`] position abstraction.

pub mod geom;
pub mod group;
pub mod map;
pub mod transform;

pub use geom::{CoordTile, Range};
pub use group::MapTileGroup;
pub use map::{DEFAULT_RADIUS, Tile, TileMap};
pub use transform::{Transform, Transformable};
