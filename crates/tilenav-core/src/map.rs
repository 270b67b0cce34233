//! The tile map query surface: [`Tile`] and [`TileMap`].
//!
//! A `TileMap` is a dense grid of optional tiles. Each tile carries a tile
//! number, which [`MapTileGroup`](crate::MapTileGroup) maps to a group name.
//! Tiles are `tile_width`×`tile_height` pixels; tile `(tx, ty)` covers the
//! pixels `[tx·tw, (tx+1)·tw) × [ty·th, (ty+1)·th)`.

use crate::geom::{CoordTile, Range};

/// Default search radius, in tiles, used when nothing else is configured.
pub const DEFAULT_RADIUS: i32 = 8;

/// A single map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    number: u32,
    tx: i32,
    ty: i32,
}

impl Tile {
    /// Create a tile with the given number at tile position `(tx, ty)`.
    pub const fn new(number: u32, tx: i32, ty: i32) -> Self {
        Self { number, tx, ty }
    }

    /// The tile number (sheet index) identifying its group.
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Horizontal tile index.
    pub const fn in_tile_x(&self) -> i32 {
        self.tx
    }

    /// Vertical tile index.
    pub const fn in_tile_y(&self) -> i32 {
        self.ty
    }

    /// Tile position as a coordinate.
    pub const fn coord(&self) -> CoordTile {
        CoordTile::new(self.tx, self.ty)
    }
}

/// A dense grid of optional tiles.
#[derive(Debug, Clone)]
pub struct TileMap {
    tiles: Vec<Option<Tile>>,
    width: i32,
    height: i32,
    tile_width: i32,
    tile_height: i32,
    radius: i32,
}

impl TileMap {
    /// Create an empty map of `width`×`height` tiles, each
    /// `tile_width`×`tile_height` pixels.
    pub fn new(width: i32, height: i32, tile_width: i32, tile_height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            tiles: vec![None; (width * height) as usize],
            width,
            height,
            tile_width: tile_width.max(1),
            tile_height: tile_height.max(1),
            radius: DEFAULT_RADIUS,
        }
    }

    /// Build a map from rows of tile numbers, listed top row first.
    ///
    /// `None` entries leave the tile empty. Rows shorter than the first are
    /// padded with empty tiles.
    pub fn from_rows(rows: &[&[Option<u32>]], tile_width: i32, tile_height: i32) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len() as i32);
        let mut map = Self::new(width, height, tile_width, tile_height);
        for (row, cells) in rows.iter().enumerate() {
            let ty = height - 1 - row as i32;
            for (tx, number) in cells.iter().enumerate() {
                if let Some(n) = number {
                    map.set_tile(tx as i32, ty, *n);
                }
            }
        }
        map
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

    /// Maximum search radius in tiles.
    #[inline]
    pub fn in_tile_radius(&self) -> i32 {
        self.radius
    }

    /// Set the maximum search radius in tiles.
    pub fn set_in_tile_radius(&mut self, radius: i32) {
        self.radius = radius.max(0);
    }

    /// The whole map as a tile range.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Whether `(tx, ty)` is inside the map.
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

    /// Tile at `(tx, ty)`, or `None` when empty or outside the map.
    pub fn tile(&self, tx: i32, ty: i32) -> Option<&Tile> {
        self.index(tx, ty).and_then(|i| self.tiles[i].as_ref())
    }

    /// Tile under the pixel position `(x, y)`.
    pub fn tile_at(&self, x: f64, y: f64) -> Option<&Tile> {
        self.tile(self.in_tile_x(x), self.in_tile_y(y))
    }

    /// Place a tile numbered `number` at `(tx, ty)`. No-op outside the map.
    pub fn set_tile(&mut self, tx: i32, ty: i32, number: u32) {
        if let Some(i) = self.index(tx, ty) {
            self.tiles[i] = Some(Tile::new(number, tx, ty));
        }
    }

    /// Remove the tile at `(tx, ty)`. No-op outside the map.
    pub fn clear_tile(&mut self, tx: i32, ty: i32) {
        if let Some(i) = self.index(tx, ty) {
            self.tiles[i] = None;
        }
    }

    /// Fill every tile of the map with `number`.
    pub fn fill(&mut self, number: u32) {
        for p in self.bounds() {
            self.set_tile(p.x, p.y, number);
        }
    }

    /// Horizontal tile index under pixel `x`.
    #[inline]
    pub fn in_tile_x(&self, x: f64) -> i32 {
        (x / f64::from(self.tile_width)).floor() as i32
    }

    /// Vertical tile index under pixel `y`.
    #[inline]
    pub fn in_tile_y(&self, y: f64) -> i32 {
        (y / f64::from(self.tile_height)).floor() as i32
    }

    /// Pixel x of the left edge of tile column `tx`.
    #[inline]
    pub fn tile_x(&self, tx: i32) -> f64 {
        f64::from(tx * self.tile_width)
    }

    /// Pixel y of the bottom edge of tile row `ty`.
    #[inline]
    pub fn tile_y(&self, ty: i32) -> f64 {
        f64::from(ty * self.tile_height)
    }

    /// Row-major iterator over the non-empty tiles.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }
}
