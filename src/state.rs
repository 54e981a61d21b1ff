//! Per-chain mutable state and the read-only snapshots published to
//! subscribers.
//!
//! `SelectionState` is single-owner: only the resolver that created it may
//! mutate it, which is what makes the epoch bookkeeping sound without any
//! locking discipline beyond the resolver's own.
//!
//! Subscribers never see this struct. They receive [`ChainSnapshot`]s —
//! cheap clones taken while the lock is held, so no subscriber can observe
//! a half-applied cascade.

use serde::{Deserialize, Serialize};

use crate::schema::ChainSchema;
use crate::types::{LevelStatus, OptionItem};

/// Mutable state of one level.
#[derive(Debug, Clone, Default)]
pub(crate) struct LevelState {
    /// Currently selected value, if any.
    pub value: Option<String>,
    /// Options resolved for the current parent value.
    pub options: Vec<OptionItem>,
    pub status: LevelStatus,
    /// Monotonic invalidation counter. A fetch result may only be
    /// committed while the epoch still equals the value captured when the
    /// fetch was issued.
    pub epoch: u64,
    /// Message of the fetch failure that put the level into `Error`.
    pub error: Option<String>,
}

/// All level state for one chain, indexed in schema order.
#[derive(Debug)]
pub(crate) struct SelectionState {
    levels: Vec<LevelState>,
}

impl SelectionState {
    pub fn new(len: usize) -> Self {
        Self {
            levels: vec![LevelState::default(); len],
        }
    }

    pub fn level(&self, pos: usize) -> &LevelState {
        &self.levels[pos]
    }

    pub fn level_mut(&mut self, pos: usize) -> &mut LevelState {
        &mut self.levels[pos]
    }

    /// Cascade-clear unit: back to empty `Idle`, epoch bumped so any
    /// in-flight fetch for this level lands stale.
    pub fn invalidate(&mut self, pos: usize) {
        let level = &mut self.levels[pos];
        level.value = None;
        level.options.clear();
        level.status = LevelStatus::Idle;
        level.error = None;
        level.epoch += 1;
    }

    pub fn snapshot(&self, schema: &ChainSchema) -> ChainSnapshot {
        ChainSnapshot {
            levels: self
                .levels
                .iter()
                .enumerate()
                .map(|(pos, level)| LevelSnapshot {
                    key: schema.key(pos).to_owned(),
                    value: level.value.clone(),
                    options: level.options.clone(),
                    status: level.status,
                    error: level.error.clone(),
                })
                .collect(),
        }
    }
}

/// Read-only view of one level at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub key: String,
    pub value: Option<String>,
    pub options: Vec<OptionItem>,
    pub status: LevelStatus,
    /// Set only while `status == Error`.
    pub error: Option<String>,
}

/// Read-only view of the whole chain, in chain order. This is what
/// subscribers receive on every state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub levels: Vec<LevelSnapshot>,
}

impl ChainSnapshot {
    /// Look up one level by key.
    pub fn level(&self, key: &str) -> Option<&LevelSnapshot> {
        self.levels.iter().find(|l| l.key == key)
    }

    /// The contiguous `(key, value)` pairs from the root down to the
    /// deepest selected level — what a screen submits with its form.
    ///
    /// Stops at the first unset level; everything below it is unset too
    /// (cascade-clear invariant), so the path is always a prefix of the
    /// chain.
    pub fn selection_path(&self) -> Vec<(String, String)> {
        self.levels
            .iter()
            .map_while(|l| l.value.as_ref().map(|v| (l.key.clone(), v.clone())))
            .collect()
    }
}
