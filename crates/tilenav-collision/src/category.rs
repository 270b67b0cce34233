use serde::{Deserialize, Serialize};

use crate::orientation::Axis;

/// Formulas applying to the tiles of one tile group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroup {
    name: String,
    /// Tile group whose tiles use these formulas.
    group: String,
    /// Formula names, in evaluation order.
    formulas: Vec<String>,
}

impl CollisionGroup {
    pub fn new<S: Into<String>>(name: &str, group: &str, formulas: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
            formulas: formulas.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn formulas(&self) -> &[String] {
        &self.formulas
    }
}

/// How an object sweeps the map: along which axis, from which point
/// relative to its position, and against which collision groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionCategory {
    name: String,
    axis: Axis,
    #[serde(default)]
    offset_x: f64,
    #[serde(default)]
    offset_y: f64,
    /// Keep the sample point attached to the surface below it.
    #[serde(default)]
    glue: bool,
    groups: Vec<String>,
}

impl CollisionCategory {
    pub fn new<S: Into<String>>(
        name: &str,
        axis: Axis,
        offset_x: f64,
        offset_y: f64,
        glue: bool,
        groups: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.to_string(),
            axis,
            offset_x,
            offset_y,
            glue,
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    pub fn is_glue(&self) -> bool {
        self.glue
    }

    pub fn set_glue(&mut self, glue: bool) {
        self.glue = glue;
    }

    /// Collision group names, in evaluation order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}
