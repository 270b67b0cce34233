//! Resolution of object movement against tile surfaces.

use std::collections::HashMap;

use tilenav_core::{CoordTile, MapTileGroup, TileMap, Transformable};

use crate::category::{CollisionCategory, CollisionGroup};
use crate::config::CollisionConfig;
use crate::error::CollisionError;
use crate::formula::CollisionFormula;
use crate::orientation::Axis;

/// Outcome of a collision sweep.
///
/// Axis values are positions for the swept object (category offset
/// removed), in world pixels. The axis that was not swept is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    x: Option<f64>,
    y: Option<f64>,
    tile: CoordTile,
    formula_x: Option<String>,
    formula_y: Option<String>,
}

impl CollisionResult {
    /// Resolved horizontal position.
    pub fn x(&self) -> Option<f64> {
        self.x
    }

    /// Resolved vertical position.
    pub fn y(&self) -> Option<f64> {
        self.y
    }

    /// Tile whose surface was hit.
    pub fn tile(&self) -> CoordTile {
        self.tile
    }

    /// Formula that produced [`x`](Self::x).
    pub fn formula_x(&self) -> Option<&str> {
        self.formula_x.as_deref()
    }

    /// Formula that produced [`y`](Self::y).
    pub fn formula_y(&self) -> Option<&str> {
        self.formula_y.as_deref()
    }
}

/// Collision model of a tile map: the tile group of every tile and the
/// configured formulas.
#[derive(Debug, Clone)]
pub struct MapTileCollision {
    width: i32,
    height: i32,
    tile_width: i32,
    tile_height: i32,
    group_names: Vec<String>,
    /// Index into `group_names` for every tile, row-major.
    tile_groups: Vec<Option<usize>>,
    formulas: HashMap<String, CollisionFormula>,
    groups: HashMap<String, CollisionGroup>,
    categories: HashMap<String, CollisionCategory>,
}

impl MapTileCollision {
    /// Build the collision model of `map`.
    ///
    /// Fails when the configuration is inconsistent or names a tile group
    /// that `groups` does not define.
    pub fn new(map: &TileMap, groups: &MapTileGroup, config: &CollisionConfig) -> Result<Self, CollisionError> {
        config.validate()?;
        config.validate_tile_groups(groups)?;

        let width = map.in_tile_width();
        let height = map.in_tile_height();
        let mut group_names: Vec<String> = Vec::new();
        let mut tile_groups = vec![None; (width * height) as usize];
        for tile in map.tiles() {
            let Some(name) = groups.group(tile) else {
                continue;
            };
            let idx = match group_names.iter().position(|g| g == name) {
                Some(idx) => idx,
                None => {
                    group_names.push(name.to_string());
                    group_names.len() - 1
                }
            };
            tile_groups[(tile.in_tile_y() * width + tile.in_tile_x()) as usize] = Some(idx);
        }

        log::debug!(
            "collision model {}x{}: {} formulas, {} groups, {} categories",
            width,
            height,
            config.formulas.len(),
            config.groups.len(),
            config.categories.len()
        );

        Ok(Self {
            width,
            height,
            tile_width: map.tile_width(),
            tile_height: map.tile_height(),
            group_names,
            tile_groups,
            formulas: by_name(&config.formulas, CollisionFormula::name),
            groups: by_name(&config.groups, CollisionGroup::name),
            categories: by_name(&config.categories, CollisionCategory::name),
        })
    }

    pub fn formula(&self, name: &str) -> Option<&CollisionFormula> {
        self.formulas.get(name)
    }

    pub fn group(&self, name: &str) -> Option<&CollisionGroup> {
        self.groups.get(name)
    }

    /// Category of the configuration, by name.
    pub fn category(&self, name: &str) -> Option<&CollisionCategory> {
        self.categories.get(name)
    }

    /// Tile group of the tile at `(tx, ty)`.
    pub fn tile_group(&self, tx: i32, ty: i32) -> Option<&str> {
        if tx < 0 || ty < 0 || tx >= self.width || ty >= self.height {
            return None;
        }
        self.tile_groups[(ty * self.width + tx) as usize].map(|i| self.group_names[i].as_str())
    }

    /// Sweep the last movement of `transformable` for `category`.
    ///
    /// The sample point (position plus category offset) walks the part of
    /// the movement that lies over the map, in steps of at most one pixel,
    /// so a fast object resolves like a slow one. Moving down (or left for
    /// `X`), a sample at or below a surface hits it. Moving up (or right),
    /// a sample hits when it enters the solid part of a tile through its
    /// low bound. Without a hit, a glue category that is not moving away
    /// from the surface is attached to the surface of the tile under the
    /// end point, or of the next tile down the swept axis.
    pub fn compute_collision<T: Transformable + ?Sized>(
        &self,
        transformable: &T,
        category: &CollisionCategory,
    ) -> Option<CollisionResult> {
        let start = (
            transformable.old_x() + category.offset_x(),
            transformable.old_y() + category.offset_y(),
        );
        let end = (
            transformable.x() + category.offset_x(),
            transformable.y() + category.offset_y(),
        );
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let rising = match category.axis() {
            Axis::Y => dy > 0.0,
            Axis::X => dx > 0.0,
        };

        if let Some((t0, t1)) = self.clip(start, end) {
            let at = |t: f64| {
                if t >= 1.0 {
                    end
                } else {
                    (start.0 + dx * t, start.1 + dy * t)
                }
            };
            let steps = (dx.abs().max(dy.abs()) * (t1 - t0)).ceil().max(1.0) as u32;
            let mut prev = at(t0);
            for i in 1..=steps {
                let t = if i == steps {
                    t1
                } else {
                    t0 + (t1 - t0) * f64::from(i) / f64::from(steps)
                };
                let point = at(t);
                if let Some(result) = self.sample_hit(category, prev, point, rising) {
                    return Some(result);
                }
                prev = point;
            }
        }

        if category.is_glue() && !rising {
            self.glue(category, end.0, end.1)
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Sampling
    // -----------------------------------------------------------------------

    /// Parameter interval of the segment `start -> end` lying over the map's
    /// pixel area, or `None` when the segment misses the map.
    fn clip(&self, start: (f64, f64), end: (f64, f64)) -> Option<(f64, f64)> {
        let axes = [
            (start.0, end.0 - start.0, f64::from(self.width * self.tile_width)),
            (start.1, end.1 - start.1, f64::from(self.height * self.tile_height)),
        ];
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, d, max) in axes {
            if d == 0.0 {
                if p < 0.0 || p > max {
                    return None;
                }
                continue;
            }
            let (a, b) = (-p / d, (max - p) / d);
            t0 = t0.max(a.min(b));
            t1 = t1.min(a.max(b));
        }
        (t0 <= t1).then_some((t0, t1))
    }

    fn tile_of(&self, px: f64, py: f64) -> CoordTile {
        CoordTile::new(
            (px / f64::from(self.tile_width)).floor() as i32,
            (py / f64::from(self.tile_height)).floor() as i32,
        )
    }

    /// In-tile coordinates of `(px, py)` inside `tile`.
    fn local(&self, tile: CoordTile, px: f64, py: f64) -> (f64, f64) {
        (
            px - f64::from(tile.x * self.tile_width),
            py - f64::from(tile.y * self.tile_height),
        )
    }

    /// Test the sample `point`, reached from `prev`.
    fn sample_hit(
        &self,
        category: &CollisionCategory,
        prev: (f64, f64),
        point: (f64, f64),
        rising: bool,
    ) -> Option<CollisionResult> {
        let tile = self.tile_of(point.0, point.1);
        let (input, across) = split(category.axis(), self.local(tile, point.0, point.1));
        let (surface, formula) = self.surface(category, tile, input)?;
        if !rising {
            return (across <= surface).then(|| self.result(category, tile, surface, formula));
        }
        // Entering the solid part from below its low bound.
        let (_, before) = split(category.axis(), self.local(tile, prev.0, prev.1));
        let face = formula.range().output_min();
        (before <= face && across >= face && across <= surface)
            .then(|| self.result(category, tile, face, formula))
    }

    fn glue(&self, category: &CollisionCategory, ex: f64, ey: f64) -> Option<CollisionResult> {
        let tile = self.tile_of(ex, ey);
        let (input, _) = split(category.axis(), self.local(tile, ex, ey));
        let next = match category.axis() {
            Axis::Y => tile.shift(0, -1),
            Axis::X => tile.shift(-1, 0),
        };
        [tile, next].into_iter().find_map(|t| {
            self.surface(category, t, input)
                .map(|(surface, formula)| self.result(category, t, surface, formula))
        })
    }

    /// First surface of `tile` applying to `category` at `input`.
    fn surface(&self, category: &CollisionCategory, tile: CoordTile, input: f64) -> Option<(f64, &CollisionFormula)> {
        let group = self.tile_group(tile.x, tile.y)?;
        category
            .groups()
            .iter()
            .filter_map(|name| self.groups.get(name))
            .filter(|g| g.group() == group)
            .flat_map(|g| g.formulas())
            .filter_map(|name| self.formulas.get(name))
            .filter(|f| f.range().output == category.axis())
            .filter(|f| {
                !f.constraint().is_disabled(|o| {
                    let (dx, dy) = o.delta();
                    self.tile_group(tile.x + dx, tile.y + dy)
                })
            })
            .find_map(|f| f.surface(input).map(|s| (s, f)))
    }

    fn result(&self, category: &CollisionCategory, tile: CoordTile, value: f64, formula: &CollisionFormula) -> CollisionResult {
        log::trace!("{}: hit {} at {tile}", category.name(), formula.name());
        match category.axis() {
            Axis::Y => CollisionResult {
                x: None,
                y: Some(f64::from(tile.y * self.tile_height) + value - category.offset_y()),
                tile,
                formula_x: None,
                formula_y: Some(formula.name().to_string()),
            },
            Axis::X => CollisionResult {
                x: Some(f64::from(tile.x * self.tile_width) + value - category.offset_x()),
                y: None,
                tile,
                formula_x: Some(formula.name().to_string()),
                formula_y: None,
            },
        }
    }
}

/// `(input, across)` of in-tile coordinates for a sweep along `axis`.
fn split(axis: Axis, (ix, iy): (f64, f64)) -> (f64, f64) {
    match axis {
        Axis::Y => (ix, iy),
        Axis::X => (iy, ix),
    }
}

fn by_name<T: Clone>(items: &[T], name: impl Fn(&T) -> &str) -> HashMap<String, T> {
    items
        .iter()
        .map(|item| (name(item).to_string(), item.clone()))
        .collect()
}
