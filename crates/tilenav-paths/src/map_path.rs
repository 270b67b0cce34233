//! Per-tile categories and object occupancy.

use std::collections::{HashMap, HashSet};

use tilenav_core::{CoordTile, MapTileGroup, Range, TileMap};

use crate::config::{MoverConfig, PathConfig};
use crate::data::PathCategory;
use crate::error::PathError;
use crate::mover::{Mover, ObjectId};

/// Path model of a tile map: the category of every tile and the set of
/// objects occupying it.
///
/// One `MapTilePath` exists per map and is shared, by reference, between
/// the [`PathFinder`](crate::PathFinder) and every mover. Occupancy only
/// changes through the add/remove/move methods.
#[derive(Debug, Clone)]
pub struct MapTilePath {
    width: i32,
    height: i32,
    tile_width: i32,
    tile_height: i32,
    radius: i32,
    categories: Vec<PathCategory>,
    /// Index into `categories` for every tile, row-major.
    tile_categories: Vec<Option<usize>>,
    occupants: Vec<HashSet<ObjectId>>,
}

impl MapTilePath {
    /// Build the path model of `map`.
    ///
    /// Fails if the configuration references a group `groups` does not
    /// define. Tiles whose group has no category, and empty tiles, get no
    /// category and are blocked for every mover.
    pub fn new(map: &TileMap, groups: &MapTileGroup, config: &PathConfig) -> Result<Self, PathError> {
        config.validate()?;
        config.validate_groups(groups)?;

        let mut by_group: HashMap<&str, usize> = HashMap::new();
        for (i, category) in config.categories.iter().enumerate() {
            for group in category.groups() {
                by_group.insert(group.as_str(), i);
            }
        }

        let width = map.in_tile_width();
        let height = map.in_tile_height();
        let len = (width * height) as usize;
        let mut tile_categories = vec![None; len];
        for tile in map.tiles() {
            let i = (tile.in_tile_y() * width + tile.in_tile_x()) as usize;
            tile_categories[i] = groups.group(tile).and_then(|g| by_group.get(g).copied());
        }

        log::debug!(
            "path model {}x{} with {} categories",
            width,
            height,
            config.categories.len()
        );

        Ok(Self {
            width,
            height,
            tile_width: map.tile_width(),
            tile_height: map.tile_height(),
            radius: map.in_tile_radius(),
            categories: config.categories.clone(),
            tile_categories,
            occupants: vec![HashSet::new(); len],
        })
    }

    /// Map width in tiles.
    #[inline]
    pub fn in_tile_width(&self) -> i32 {
        self.width
    }

    /// Map height in tiles.
    #[inline]
    pub fn in_tile_height(&self) -> i32 {
        self.height
    }

    /// Width of one tile, in pixels.
    #[inline]
    pub fn tile_width(&self) -> i32 {
        self.tile_width
    }

    /// Height of one tile, in pixels.
    #[inline]
    pub fn tile_height(&self) -> i32 {
        self.tile_height
    }

    /// Default search radius in tiles.
    #[inline]
    pub fn in_tile_radius(&self) -> i32 {
        self.radius
    }

    pub fn categories(&self) -> &[PathCategory] {
        &self.categories
    }

    #[inline]
    pub fn contains(&self, tx: i32, ty: i32) -> bool {
        tx >= 0 && ty >= 0 && tx < self.width && ty < self.height
    }

    #[inline]
    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if self.contains(tx, ty) {
            Some((ty * self.width + tx) as usize)
        } else {
            None
        }
    }

    /// Category name of the tile at `(tx, ty)`.
    pub fn category(&self, tx: i32, ty: i32) -> Option<&str> {
        let i = self.index(tx, ty)?;
        self.tile_categories[i].map(|c| self.categories[c].name())
    }

    /// Category covering the tile group `group`.
    pub fn category_of_group(&self, group: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.groups().iter().any(|g| g == group))
            .map(PathCategory::name)
    }

    // -----------------------------------------------------------------------
    // Occupancy
    // -----------------------------------------------------------------------

    /// Mark `id` as occupying `(tx, ty)`. No-op outside the map.
    pub fn add_object_id(&mut self, tx: i32, ty: i32, id: ObjectId) {
        if let Some(i) = self.index(tx, ty) {
            self.occupants[i].insert(id);
        }
    }

    /// Remove `id` from `(tx, ty)`. No-op outside the map.
    pub fn remove_object_id(&mut self, tx: i32, ty: i32, id: ObjectId) {
        if let Some(i) = self.index(tx, ty) {
            self.occupants[i].remove(&id);
        }
    }

    /// Mark `id` on every tile of `area`.
    pub fn add_object_ids(&mut self, area: Range, id: ObjectId) {
        for p in area {
            self.add_object_id(p.x, p.y, id);
        }
    }

    /// Remove `id` from every tile of `area`.
    pub fn remove_object_ids(&mut self, area: Range, id: ObjectId) {
        for p in area {
            self.remove_object_id(p.x, p.y, id);
        }
    }

    /// Release `from` and claim `to` for `id` in one call.
    pub fn move_object_ids(&mut self, from: Range, to: Range, id: ObjectId) {
        self.remove_object_ids(from, id);
        self.add_object_ids(to, id);
    }

    /// Objects on `(tx, ty)`; empty outside the map.
    pub fn object_ids(&self, tx: i32, ty: i32) -> impl Iterator<Item = ObjectId> + '_ {
        self.index(tx, ty)
            .into_iter()
            .flat_map(move |i| self.occupants[i].iter().copied())
    }

    /// Whether any object occupies `(tx, ty)`.
    pub fn is_occupied(&self, tx: i32, ty: i32) -> bool {
        self.index(tx, ty)
            .is_some_and(|i| !self.occupants[i].is_empty())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether `mover` cannot enter `(tx, ty)`.
    ///
    /// Outside the map is always blocked, and so is a tile without category.
    /// The category blocking flag is always checked. Occupants are checked
    /// unless `ignore_occupancy` is set; the mover itself and its ignored
    /// ids never block.
    pub fn is_blocked<M: Mover + ?Sized>(&self, mover: &M, tx: i32, ty: i32, ignore_occupancy: bool) -> bool {
        let Some(i) = self.index(tx, ty) else {
            return true;
        };
        let Some(category) = self.category(tx, ty) else {
            return true;
        };
        if mover.is_blocking(category) {
            return true;
        }
        if ignore_occupancy {
            return false;
        }
        let own = mover.id();
        self.occupants[i]
            .iter()
            .any(|&id| id != own && !mover.is_ignored_id(id))
    }

    /// Whether `mover`, placed with its footprint at `(tx, ty)`, would cover
    /// a tile that [`is_blocked`](Self::is_blocked).
    pub fn is_footprint_blocked<M: Mover + ?Sized>(&self, mover: &M, tx: i32, ty: i32, ignore_occupancy: bool) -> bool {
        Range::footprint(CoordTile::new(tx, ty), mover.in_tile_width(), mover.in_tile_height())
            .iter()
            .any(|p| self.is_blocked(mover, p.x, p.y, ignore_occupancy))
    }

    /// Whether the `tw`×`th` rectangle at `(tx, ty)` can be occupied by
    /// `mover`: every tile in the map, not blocking by category, and free of
    /// objects other than `ignore_id`.
    pub fn is_area_available<M: Mover + ?Sized>(
        &self,
        mover: &M,
        tx: i32,
        ty: i32,
        tw: i32,
        th: i32,
        ignore_id: ObjectId,
    ) -> bool {
        Range::footprint(CoordTile::new(tx, ty), tw, th).iter().all(|p| {
            let Some(i) = self.index(p.x, p.y) else {
                return false;
            };
            let free = self.occupants[i].iter().all(|&id| id == ignore_id);
            free && self.category(p.x, p.y).is_some_and(|c| !mover.is_blocking(c))
        })
    }

    /// Occupants of the `area` that block `mover`: everything except the
    /// mover itself and its ignored ids.
    pub fn blocking_ids<M: Mover + ?Sized>(&self, mover: &M, area: Range) -> Vec<ObjectId> {
        let own = mover.id();
        let mut ids: Vec<ObjectId> = area
            .iter()
            .flat_map(|p| self.object_ids(p.x, p.y))
            .filter(|&id| id != own && !mover.is_ignored_id(id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Closest available `stw`×`sth` area around `(stx, sty)`, measured to
    /// the `dtw`×`dth` area at `(dtx, dty)`.
    ///
    /// Rings of growing size are scanned; the first ring holding an available
    /// tile decides, and within it the tile nearest to the destination area
    /// wins (first in row-major order on ties). `None` past `radius`.
    #[allow(clippy::too_many_arguments)]
    pub fn closest_available_tile<M: Mover + ?Sized>(
        &self,
        mover: &M,
        stx: i32,
        sty: i32,
        stw: i32,
        sth: i32,
        dtx: i32,
        dty: i32,
        dtw: i32,
        dth: i32,
        radius: i32,
    ) -> Option<CoordTile> {
        let id = mover.id();
        let target = Range::footprint(CoordTile::new(dtx, dty), dtw, dth);
        for size in 0..=radius {
            let mut best: Option<(f64, CoordTile)> = None;
            for p in ring(CoordTile::new(stx, sty), size) {
                if !self.is_area_available(mover, p.x, p.y, stw, sth, id) {
                    continue;
                }
                let d = area_distance(Range::footprint(p, stw, sth), target);
                if best.is_none_or(|(bd, _)| d < bd) {
                    best = Some((d, p));
                }
            }
            if let Some((_, p)) = best {
                return Some(p);
            }
        }
        None
    }

    /// First available `tw`×`th` area in ring order around `(tx, ty)`.
    ///
    /// `None` when nothing is free within `radius` rings.
    pub fn free_tile_around<M: Mover + ?Sized>(
        &self,
        mover: &M,
        tx: i32,
        ty: i32,
        tw: i32,
        th: i32,
        radius: i32,
    ) -> Option<CoordTile> {
        let id = mover.id();
        (0..=radius)
            .flat_map(|size| ring(CoordTile::new(tx, ty), size))
            .find(|p| self.is_area_available(mover, p.x, p.y, tw, th, id))
    }

    /// Check a mover configuration against this map: it must be valid on
    /// its own and only use categories the map defines.
    pub fn validate_mover(&self, config: &MoverConfig) -> Result<(), PathError> {
        config.validate()?;
        config.validate_categories(&self.categories)
    }

    /// Movement cost of `(tx, ty)` for `mover`.
    ///
    /// Zero when there is no tile or category; an error when the mover has
    /// no data for the tile's category.
    pub fn cost<M: Mover + ?Sized>(&self, mover: &M, tx: i32, ty: i32) -> Result<f64, PathError> {
        match self.category(tx, ty) {
            Some(category) => mover.cost(category),
            None => Ok(0.0),
        }
    }
}

/// Tiles at Chebyshev distance exactly `size` from `center`, row-major.
fn ring(center: CoordTile, size: i32) -> impl Iterator<Item = CoordTile> {
    let (bottom, top) = (center.y - size, center.y + size);
    (bottom..=top).flat_map(move |y| {
        // inner rows only hold the two side tiles
        let step = if y == bottom || y == top { 1 } else { (2 * size) as usize };
        (center.x - size..=center.x + size)
            .step_by(step)
            .map(move |x| CoordTile::new(x, y))
    })
}

/// Euclidean gap between two tile areas; zero when they overlap.
fn area_distance(a: Range, b: Range) -> f64 {
    let gap = |a0: i32, a1: i32, b0: i32, b1: i32| -> f64 {
        if a1 <= b0 {
            f64::from(b0 - a1 + 1)
        } else if b1 <= a0 {
            f64::from(a0 - b1 + 1)
        } else {
            0.0
        }
    };
    let dx = gap(a.min.x, a.max.x, b.min.x, b.max.x);
    let dy = gap(a.min.y, a.max.y, b.min.y, b.max.y);
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub const GROUND: u32 = 0;
    pub const WALL: u32 = 1;
    pub const MUD: u32 = 2;

    /// Map built from rows (top row first): `.` ground, `#` wall, `m` mud,
    /// ` ` empty.
    pub fn map_from_ascii(rows: &[&str]) -> MapTilePath {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len() as i32);
        let mut map = TileMap::new(width, height, 16, 16);
        for (row, line) in rows.iter().enumerate() {
            let ty = height - 1 - row as i32;
            for (tx, ch) in line.chars().enumerate() {
                match ch {
                    '.' => map.set_tile(tx as i32, ty, GROUND),
                    '#' => map.set_tile(tx as i32, ty, WALL),
                    'm' => map.set_tile(tx as i32, ty, MUD),
                    _ => {}
                }
            }
        }
        let groups = MapTileGroup::new()
            .with_group("ground", [GROUND])
            .with_group("wall", [WALL])
            .with_group("mud", [MUD]);
        let config = PathConfig::new(vec![
            PathCategory::new("ground", ["ground"]),
            PathCategory::new("wall", ["wall"]),
            PathCategory::new("mud", ["mud"]),
        ]);
        MapTilePath::new(&map, &groups, &config).expect("valid test map")
    }
}
