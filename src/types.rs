//! Value types crossing the engine boundary.
//!
//! Everything here is serde-derived so hosting screens can hand snapshots
//! straight to whatever rendering layer they use.

use serde::{Deserialize, Serialize};

/// One selectable option as returned by a level's data source.
///
/// Immutable once produced by a fetch; the engine never edits option
/// lists, it only replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Stable identifier the screen submits back to the server.
    pub id: String,
    /// Human-readable text the screen renders.
    pub label: String,
}

impl OptionItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Lifecycle of one level's option list.
///
/// `Idle → Loading → Ready`, `Idle → Loading → Error`, and any state back
/// to `Idle` via cascade-clear from an ancestor change. `Idle` is both the
/// initial state and a valid resting state for a level whose parent is
/// unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStatus {
    /// No options loaded and no fetch in flight.
    #[default]
    Idle,
    /// A fetch for this level's options is in flight.
    Loading,
    /// Options reflect the latest fetch for the current parent value.
    Ready,
    /// The latest fetch failed; options are empty and retryable.
    Error,
}
