//! Pathfinding over tile maps.
//!
//! This crate finds and follows paths on a [`TileMap`](tilenav_core::TileMap):
//!
//! - **Path model** ([`MapTilePath`]): the path category of every tile and
//!   the objects occupying it
//! - **A\*** search ([`PathFinder::find_path`]) with per-category costs and
//!   allowed moves, and redirection when the destination is blocked
//! - **Movers** ([`Pathfindable`]) walking a path step by step, claiming
//!   tiles as they go and routing around each other
//!
//! Categories are configured per map ([`PathConfig`]) and traversal data
//! per mover ([`MoverConfig`]); both load from JSON.
//!
//! # Costs
//!
//! Leaving a tile costs the mover's cost for that tile's category. The
//! destination tile's own cost is therefore never paid.

mod config;
mod data;
mod error;
mod finder;
mod heuristic;
mod map_path;
mod movement;
mod mover;
mod node;
mod path;
mod pathfindable;

pub use config::{MoverConfig, PathConfig};
pub use data::{PathCategory, PathData};
pub use error::PathError;
pub use finder::PathFinder;
pub use heuristic::{Euclidean, Heuristic, Manhattan, SquaredEuclidean};
pub use map_path::MapTilePath;
pub use movement::MovementTile;
pub use mover::{Mover, ObjectId};
pub use path::Path;
pub use pathfindable::{DIAGONAL_SPEED_FACTOR, Pathfindable, PathfindableListener};
