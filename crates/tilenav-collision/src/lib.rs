//! Collision between moving objects and the surfaces of a tile map.
//!
//! Surfaces are described by [`CollisionFormula`]s: a linear function of
//! the position across a tile giving the height (or depth) of the solid
//! part. Formulas are bundled per tile group into [`CollisionGroup`]s, and
//! an object sweeps them through [`CollisionCategory`]s naming the axis, the
//! sample offset and the groups it collides with.
//!
//! [`MapTileCollision::compute_collision`] resolves one movement by walking
//! it pixel by pixel; [`TileCollidable`] runs every category of an object
//! and reports hits to listeners.

mod category;
mod collidable;
mod config;
mod error;
mod formula;
mod map_collision;
mod orientation;

pub use category::{CollisionCategory, CollisionGroup};
pub use collidable::{TileCollidable, TileCollidableListener};
pub use config::CollisionConfig;
pub use error::CollisionError;
pub use formula::{CollisionConstraint, CollisionFormula, CollisionFunction, CollisionRange};
pub use map_collision::{CollisionResult, MapTileCollision};
pub use orientation::{Axis, Orientation};
