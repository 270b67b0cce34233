//! Cost estimates ranking candidate tiles during search.

/// Estimated remaining cost from `(sx, sy)` to `(dx, dy)`.
///
/// Implementations are pure and grow with distance.
pub trait Heuristic {
    fn cost(&self, sx: i32, sy: i32, dx: i32, dy: i32) -> f64;
}

/// Straight-line distance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Euclidean;

impl Heuristic for Euclidean {
    fn cost(&self, sx: i32, sy: i32, dx: i32, dy: i32) -> f64 {
        let x = f64::from(dx - sx);
        let y = f64::from(dy - sy);
        (x * x + y * y).sqrt()
    }
}

/// Squared straight-line distance.
///
/// Cheaper than [`Euclidean`] and overestimates for long distances, so only
/// meaningful when every estimate of a search uses it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SquaredEuclidean;

impl Heuristic for SquaredEuclidean {
    fn cost(&self, sx: i32, sy: i32, dx: i32, dy: i32) -> f64 {
        let x = f64::from(dx - sx);
        let y = f64::from(dy - sy);
        x * x + y * y
    }
}

/// Manhattan (L1) distance scaled by the cheapest movement cost of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manhattan {
    min_cost: f64,
}

impl Manhattan {
    pub fn new(min_cost: f64) -> Self {
        Self { min_cost }
    }

    pub fn min_cost(&self) -> f64 {
        self.min_cost
    }
}

impl Default for Manhattan {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Heuristic for Manhattan {
    fn cost(&self, sx: i32, sy: i32, dx: i32, dy: i32) -> f64 {
        self.min_cost * f64::from((dx - sx).abs() + (dy - sy).abs())
    }
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    fn cost(&self, sx: i32, sy: i32, dx: i32, dy: i32) -> f64 {
        (**self).cost(sx, sy, dx, dy)
    }
}
