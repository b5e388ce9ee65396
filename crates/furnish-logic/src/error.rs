//! Error types for the planner.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlacementError>;

/// Everything that can stop a layout from being produced.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// A requested item name has no catalog entry.
    #[error("Unknown catalog item: {name}")]
    UnknownCatalogItem { name: String },

    /// One item used up its trial budget inside a single global attempt.
    /// The planner absorbs this and restarts; it only escapes from
    /// [`crate::placement::place_attempt`].
    #[error("Item '{item}' did not fit after {trials} trials")]
    ItemDoesNotFit { item: String, trials: u32 },

    /// Every global attempt was abandoned.
    #[error("Placement exhausted after {attempts} attempts (last failure: '{item}')")]
    PlacementExhausted { item: String, attempts: u32 },

    /// Geometry was valid but the walker cannot reach these items.
    #[error("No human approach to: {}", items.join(", "))]
    AccessibilityUnreachable { items: Vec<String> },

    #[error("Invalid room: {0}")]
    InvalidRoom(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacementError {
    /// Whether a fresh run with a new seed could succeed.
    ///
    /// Input errors (unknown names, bad bounds, bad catalog data) are
    /// permanent; exhausted placement and unreachable items are a matter of
    /// the random draw.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlacementError::ItemDoesNotFit { .. }
                | PlacementError::PlacementExhausted { .. }
                | PlacementError::AccessibilityUnreachable { .. }
        )
    }
}
