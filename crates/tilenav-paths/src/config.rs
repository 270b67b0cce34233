//! Declarative path configuration, read from and written to JSON.
//!
//! Two documents exist: the map side ([`PathConfig`], categories and the
//! tile groups they cover) and the mover side ([`MoverConfig`], cost,
//! blocking flag and allowed moves per category). Both are validated on
//! load, so runtime lookups can rely on them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tilenav_core::MapTileGroup;

use crate::data::{PathCategory, PathData};
use crate::error::PathError;

/// Map-side path configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConfig {
    pub categories: Vec<PathCategory>,
}

impl PathConfig {
    pub fn new(categories: Vec<PathCategory>) -> Self {
        Self { categories }
    }

    /// Parse and validate a configuration document.
    pub fn from_json(s: &str) -> Result<Self, PathError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, PathError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that category names are unique.
    pub fn validate(&self) -> Result<(), PathError> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.name()) {
                return Err(PathError::DuplicateCategory(category.name().to_string()));
            }
        }
        Ok(())
    }

    /// Check that every referenced group exists in `groups`.
    pub fn validate_groups(&self, groups: &MapTileGroup) -> Result<(), PathError> {
        for category in &self.categories {
            if let Some(group) = category.groups().iter().find(|g| !groups.contains_group(g)) {
                return Err(PathError::UnknownGroup {
                    category: category.name().to_string(),
                    group: group.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn category(&self, name: &str) -> Option<&PathCategory> {
        self.categories.iter().find(|c| c.name() == name)
    }
}

/// Mover-side path configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoverConfig {
    pub data: Vec<PathData>,
}

impl MoverConfig {
    pub fn new(data: Vec<PathData>) -> Self {
        Self { data }
    }

    /// Parse and validate a configuration document.
    ///
    /// Movement names are checked by deserialization; costs must be finite
    /// and non-negative and categories unique.
    pub fn from_json(s: &str) -> Result<Self, PathError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, PathError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), PathError> {
        let mut seen = HashSet::new();
        for data in &self.data {
            if !data.cost().is_finite() || data.cost() < 0.0 {
                return Err(PathError::InvalidCost {
                    category: data.name().to_string(),
                    cost: data.cost(),
                });
            }
            if !seen.insert(data.name()) {
                return Err(PathError::DuplicateCategory(data.name().to_string()));
            }
        }
        Ok(())
    }

    /// Check that every category is one of the map-side `categories`.
    pub fn validate_categories(&self, categories: &[PathCategory]) -> Result<(), PathError> {
        match self
            .data
            .iter()
            .find(|d| !categories.iter().any(|c| c.name() == d.name()))
        {
            Some(data) => Err(PathError::UnknownCategory(data.name().to_string())),
            None => Ok(()),
        }
    }

    /// Smallest movement cost among non-blocking categories, suitable for
    /// [`Manhattan`](crate::Manhattan).
    pub fn min_cost(&self) -> Option<f64> {
        self.data
            .iter()
            .filter(|d| !d.is_blocking())
            .map(PathData::cost)
            .reduce(f64::min)
    }
}
