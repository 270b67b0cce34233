//! Collision formulas: where the solid surface of a tile lies.
//!
//! A formula maps a position along one axis of a tile (the input) to the
//! surface position on the other axis (the output), both in pixels relative
//! to the tile origin. Points at or below the surface (`<=`) are solid.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::orientation::{Axis, Orientation};

/// Where a formula applies, in in-tile pixels.
///
/// `output` names the resolved axis. The bounds of the other axis limit the
/// input; the bounds of `output` clamp the computed surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionRange {
    pub output: Axis,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl CollisionRange {
    pub fn new(output: Axis, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            output,
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Whether bounds are finite and ordered.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }

    /// Whether `input` lies inside the input bounds.
    pub fn accepts(&self, input: f64) -> bool {
        match self.output {
            Axis::Y => (self.min_x..=self.max_x).contains(&input),
            Axis::X => (self.min_y..=self.max_y).contains(&input),
        }
    }

    /// Low bound of the output axis, where the solid part of a tile starts.
    pub fn output_min(&self) -> f64 {
        match self.output {
            Axis::Y => self.min_y,
            Axis::X => self.min_x,
        }
    }

    /// Clamp a surface value into the output bounds.
    pub fn clamp_output(&self, value: f64) -> f64 {
        match self.output {
            Axis::Y => value.max(self.min_y).min(self.max_y),
            Axis::X => value.max(self.min_x).min(self.max_x),
        }
    }
}

/// One-dimensional surface function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CollisionFunction {
    /// `a * input + b`.
    Linear { a: f64, b: f64 },
}

impl CollisionFunction {
    pub fn compute(&self, input: f64) -> f64 {
        match *self {
            Self::Linear { a, b } => a * input + b,
        }
    }
}

/// Serialized form of one constraint orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintEntry {
    orientation: Orientation,
    groups: BTreeSet<String>,
}

/// Neighbour groups that disable a formula.
///
/// For each orientation, the tile groups that, when found on the neighbour
/// in that direction, switch the formula off. A slope top next to another
/// slope tile, for instance, is not a surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ConstraintEntry>", into = "Vec<ConstraintEntry>")]
pub struct CollisionConstraint {
    entries: BTreeMap<Orientation, BTreeSet<String>>,
}

impl CollisionConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, orientation: Orientation, group: &str) {
        self.entries
            .entry(orientation)
            .or_default()
            .insert(group.to_string());
    }

    pub fn with(mut self, orientation: Orientation, group: &str) -> Self {
        self.add(orientation, group);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Groups constrained in `orientation`.
    pub fn groups(&self, orientation: Orientation) -> impl Iterator<Item = &str> {
        self.entries
            .get(&orientation)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Every orientation with its groups.
    pub fn iter(&self) -> impl Iterator<Item = (Orientation, &BTreeSet<String>)> {
        self.entries.iter().map(|(o, g)| (*o, g))
    }

    /// Whether `neighbour` yields the group of the neighbouring tile in a
    /// direction that disables the formula.
    pub fn is_disabled<'a>(&self, mut neighbour: impl FnMut(Orientation) -> Option<&'a str>) -> bool {
        self.entries
            .iter()
            .any(|(o, groups)| neighbour(*o).is_some_and(|g| groups.contains(g)))
    }
}

impl From<Vec<ConstraintEntry>> for CollisionConstraint {
    fn from(entries: Vec<ConstraintEntry>) -> Self {
        let mut constraint = Self::new();
        for entry in entries {
            constraint
                .entries
                .entry(entry.orientation)
                .or_default()
                .extend(entry.groups);
        }
        constraint
    }
}

impl From<CollisionConstraint> for Vec<ConstraintEntry> {
    fn from(constraint: CollisionConstraint) -> Self {
        constraint
            .entries
            .into_iter()
            .map(|(orientation, groups)| ConstraintEntry { orientation, groups })
            .collect()
    }
}

/// Named surface definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionFormula {
    name: String,
    range: CollisionRange,
    function: CollisionFunction,
    #[serde(default, skip_serializing_if = "CollisionConstraint::is_empty")]
    constraint: CollisionConstraint,
}

impl CollisionFormula {
    pub fn new(
        name: &str,
        range: CollisionRange,
        function: CollisionFunction,
        constraint: CollisionConstraint,
    ) -> Self {
        Self {
            name: name.to_string(),
            range,
            function,
            constraint,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> &CollisionRange {
        &self.range
    }

    pub fn function(&self) -> &CollisionFunction {
        &self.function
    }

    pub fn constraint(&self) -> &CollisionConstraint {
        &self.constraint
    }

    /// Surface position for `input`, or `None` when the input is out of
    /// range.
    pub fn surface(&self, input: f64) -> Option<f64> {
        self.range
            .accepts(input)
            .then(|| self.range.clamp_output(self.function.compute(input)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slope() -> CollisionFormula {
        CollisionFormula::new(
            "slope",
            CollisionRange::new(Axis::Y, 0.0, 15.0, 0.0, 15.0),
            CollisionFunction::Linear { a: 0.5, b: 2.0 },
            CollisionConstraint::new().with(Orientation::North, "ground"),
        )
    }

    #[test]
    fn surface_is_clamped_and_bounded() {
        let f = slope();
        assert_eq!(f.surface(4.0), Some(4.0));
        assert_eq!(f.surface(15.0), Some(9.5));
        assert_eq!(f.surface(16.0), None);
        assert_eq!(f.surface(-0.5), None);

        let steep = CollisionFormula::new(
            "steep",
            CollisionRange::new(Axis::Y, 0.0, 15.0, 0.0, 15.0),
            CollisionFunction::Linear { a: 2.0, b: 0.0 },
            CollisionConstraint::new(),
        );
        assert_eq!(steep.surface(10.0), Some(15.0));
    }

    #[test]
    fn x_output_reads_y_input() {
        let range = CollisionRange::new(Axis::X, 0.0, 15.0, 4.0, 8.0);
        assert!(range.accepts(6.0));
        assert!(!range.accepts(2.0));
        assert_eq!(range.clamp_output(20.0), 15.0);
        assert_eq!(range.output_min(), 0.0);
        assert_eq!(CollisionRange::new(Axis::Y, 0.0, 16.0, 4.0, 8.0).output_min(), 4.0);
    }

    #[test]
    fn invalid_ranges() {
        assert!(CollisionRange::new(Axis::Y, 0.0, 15.0, 0.0, 15.0).is_valid());
        assert!(!CollisionRange::new(Axis::Y, 3.0, 1.0, 0.0, 15.0).is_valid());
        assert!(!CollisionRange::new(Axis::Y, 0.0, f64::NAN, 0.0, 15.0).is_valid());
    }

    #[test]
    fn constraint_disables_on_neighbour() {
        let f = slope();
        assert!(f.constraint().is_disabled(|o| (o == Orientation::North).then_some("ground")));
        assert!(!f.constraint().is_disabled(|o| (o == Orientation::North).then_some("water")));
        assert!(!f.constraint().is_disabled(|_| None));
        assert_eq!(f.constraint().groups(Orientation::North).collect::<Vec<_>>(), ["ground"]);
    }

    #[test]
    fn formula_json_shape() {
        let json = serde_json::to_value(slope()).unwrap();
        assert_eq!(json["function"]["type"], "linear");
        assert_eq!(json["range"]["output"], "Y");
        assert_eq!(json["constraint"][0]["orientation"], "NORTH");
        assert_eq!(json["constraint"][0]["groups"][0], "ground");
    }
}
