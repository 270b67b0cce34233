//! Position abstraction consumed by collision sweeps.

/// An object with a current and a previous pixel position.
///
/// The previous position is the one the object had before its last move,
/// so `(x - old_x, y - old_y)` is the movement delta of the frame.
pub trait Transformable {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn old_x(&self) -> f64;
    fn old_y(&self) -> f64;

    /// Horizontal movement of the last frame.
    fn delta_x(&self) -> f64 {
        self.x() - self.old_x()
    }

    /// Vertical movement of the last frame.
    fn delta_y(&self) -> f64 {
        self.y() - self.old_y()
    }
}

/// Plain [`Transformable`] value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    x: f64,
    y: f64,
    old_x: f64,
    old_y: f64,
}

impl Transform {
    /// Create a transform at `(x, y)` with no movement yet.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            old_x: x,
            old_y: y,
        }
    }

    /// Move by `(dx, dy)`, remembering the current position as the old one.
    pub fn move_location(&mut self, extrp: f64, dx: f64, dy: f64) {
        self.old_x = self.x;
        self.old_y = self.y;
        self.x += dx * extrp;
        self.y += dy * extrp;
    }

    /// Jump to `(x, y)` with no movement delta.
    pub fn teleport(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.old_x = x;
        self.old_y = y;
    }

    /// Replace only the horizontal position, keeping the old one.
    pub fn teleport_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Replace only the vertical position, keeping the old one.
    pub fn teleport_y(&mut self, y: f64) {
        self.y = y;
    }
}

impl Transformable for Transform {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn old_x(&self) -> f64 {
        self.old_x
    }
    fn old_y(&self) -> f64 {
        self.old_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_tracks_old_position() {
        let mut t = Transform::new(10.0, 20.0);
        assert_eq!(t.delta_x(), 0.0);
        t.move_location(2.0, -1.5, 3.0);
        assert_eq!(t.old_x(), 10.0);
        assert_eq!(t.x(), 7.0);
        assert_eq!(t.y(), 26.0);
        assert_eq!(t.delta_x(), -3.0);
        assert_eq!(t.delta_y(), 6.0);
    }

    #[test]
    fn teleport_resets_delta() {
        let mut t = Transform::new(0.0, 0.0);
        t.move_location(1.0, 5.0, 5.0);
        t.teleport(1.0, 2.0);
        assert_eq!(t.delta_x(), 0.0);
        assert_eq!(t.delta_y(), 0.0);
        t.teleport_y(4.0);
        assert_eq!(t.delta_y(), 2.0);
    }
}
