use thiserror::Error;

/// Errors raised while loading path configuration or querying costs.
#[derive(Debug, Error)]
pub enum PathError {
    /// A category name is not known where it is referenced.
    #[error("unknown path category \u{201c}{0}\u{201d}")]
    UnknownCategory(String),

    /// A movement name does not match any [`MovementTile`](crate::MovementTile).
    #[error("unknown movement \u{201c}{0}\u{201d}")]
    UnknownMovement(String),

    /// A category references a tile group the map does not define.
    #[error("category \u{201c}{category}\u{201d} references unknown group \u{201c}{group}\u{201d}")]
    UnknownGroup { category: String, group: String },

    /// The same category name is defined twice.
    #[error("path category \u{201c}{0}\u{201d} defined more than once")]
    DuplicateCategory(String),

    /// A movement cost is negative or not a number.
    #[error("invalid cost {cost} for path category \u{201c}{category}\u{201d}")]
    InvalidCost { category: String, cost: f64 },

    /// Malformed configuration text.
    #[error("invalid path configuration: {0}")]
    Config(#[from] serde_json::Error),
}
