use thiserror::Error;

/// Errors raised while loading collision configuration.
#[derive(Debug, Error)]
pub enum CollisionError {
    #[error("unknown axis \u{201c}{0}\u{201d}")]
    UnknownAxis(String),

    #[error("unknown orientation \u{201c}{0}\u{201d}")]
    UnknownOrientation(String),

    /// A collision group references a formula that is not defined.
    #[error("group \u{201c}{group}\u{201d} references unknown formula \u{201c}{formula}\u{201d}")]
    UnknownFormula { group: String, formula: String },

    /// A category references an undefined collision group, or a collision
    /// group references a tile group the map does not define.
    #[error("\u{201c}{owner}\u{201d} references unknown group \u{201c}{group}\u{201d}")]
    UnknownGroup { owner: String, group: String },

    #[error("unknown collision category \u{201c}{0}\u{201d}")]
    UnknownCategory(String),

    /// A name is defined twice among formulas, groups or categories.
    #[error("\u{201c}{0}\u{201d} defined more than once")]
    DuplicateName(String),

    /// A formula range has a minimum above its maximum, or a non-finite
    /// bound.
    #[error("invalid range in formula \u{201c}{0}\u{201d}")]
    InvalidRange(String),

    /// Malformed configuration text.
    #[error("invalid collision configuration: {0}")]
    Config(#[from] serde_json::Error),
}
