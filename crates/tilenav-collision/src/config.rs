//! Declarative collision configuration, read from and written to JSON.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tilenav_core::MapTileGroup;

use crate::category::{CollisionCategory, CollisionGroup};
use crate::error::CollisionError;
use crate::formula::CollisionFormula;

/// Formulas, the groups bundling them per tile group, and the categories
/// objects sweep with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionConfig {
    #[serde(default)]
    pub formulas: Vec<CollisionFormula>,
    #[serde(default)]
    pub groups: Vec<CollisionGroup>,
    #[serde(default)]
    pub categories: Vec<CollisionCategory>,
}

impl CollisionConfig {
    pub fn new(
        formulas: Vec<CollisionFormula>,
        groups: Vec<CollisionGroup>,
        categories: Vec<CollisionCategory>,
    ) -> Self {
        Self {
            formulas,
            groups,
            categories,
        }
    }

    /// Parse and validate a configuration document.
    ///
    /// Axis and orientation names are checked by deserialization, the rest
    /// by [`validate`](Self::validate).
    pub fn from_json(s: &str) -> Result<Self, CollisionError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, CollisionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check names are unique per kind, ranges are well formed, and every
    /// reference resolves.
    pub fn validate(&self) -> Result<(), CollisionError> {
        unique(self.formulas.iter().map(CollisionFormula::name))?;
        unique(self.groups.iter().map(CollisionGroup::name))?;
        unique(self.categories.iter().map(CollisionCategory::name))?;

        if let Some(f) = self.formulas.iter().find(|f| !f.range().is_valid()) {
            return Err(CollisionError::InvalidRange(f.name().to_string()));
        }
        for group in &self.groups {
            if let Some(formula) = group.formulas().iter().find(|n| self.formula(n).is_none()) {
                return Err(CollisionError::UnknownFormula {
                    group: group.name().to_string(),
                    formula: formula.clone(),
                });
            }
        }
        for category in &self.categories {
            if let Some(group) = category.groups().iter().find(|n| self.group(n).is_none()) {
                return Err(CollisionError::UnknownGroup {
                    owner: category.name().to_string(),
                    group: group.clone(),
                });
            }
        }
        Ok(())
    }

    /// Check that every collision group names a tile group of `groups`.
    pub fn validate_tile_groups(&self, groups: &MapTileGroup) -> Result<(), CollisionError> {
        match self.groups.iter().find(|g| !groups.contains_group(g.group())) {
            Some(g) => Err(CollisionError::UnknownGroup {
                owner: g.name().to_string(),
                group: g.group().to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn formula(&self, name: &str) -> Option<&CollisionFormula> {
        self.formulas.iter().find(|f| f.name() == name)
    }

    pub fn group(&self, name: &str) -> Option<&CollisionGroup> {
        self.groups.iter().find(|g| g.name() == name)
    }

    pub fn category(&self, name: &str) -> Option<&CollisionCategory> {
        self.categories.iter().find(|c| c.name() == name)
    }
}

fn unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), CollisionError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(CollisionError::DuplicateName(name.to_string()));
        }
    }
    Ok(())
}
