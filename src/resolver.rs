//! The controller that mutates [`SelectionState`] and orchestrates fetches.
//!
//! All state transitions funnel through one write lock; fetches run on
//! spawned tasks and commit through an epoch token check, so a response
//! for a superseded selection can never overwrite a newer one — the
//! central correctness guarantee of the whole subsystem.
//!
//! Cancellation is logical, not physical: a superseded fetch is not
//! aborted at the transport layer, its result is unconditionally ignored.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::error::SelectionError;
use crate::schema::ChainSchema;
use crate::state::{ChainSnapshot, SelectionState};
use crate::types::LevelStatus;

pub(crate) struct DependencyResolver {
    schema: Arc<ChainSchema>,
    state: Arc<RwLock<SelectionState>>,
    notifier: watch::Sender<ChainSnapshot>,
}

impl DependencyResolver {
    pub fn new(schema: ChainSchema) -> Self {
        let state = SelectionState::new(schema.len());
        let (notifier, _) = watch::channel(state.snapshot(&schema));
        Self {
            schema: Arc::new(schema),
            state: Arc::new(RwLock::new(state)),
            notifier,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ChainSnapshot> {
        self.notifier.subscribe()
    }

    pub async fn snapshot(&self) -> ChainSnapshot {
        self.state.read().await.snapshot(&self.schema)
    }

    /// Select `value` at `key` and cascade.
    ///
    /// Re-selecting the current value is a no-op: no fetch is issued and
    /// nothing downstream is reset. Selecting on a non-root level whose
    /// parent is unset is rejected without touching state.
    pub async fn set_selection(
        &self,
        key: &str,
        value: Option<&str>,
    ) -> Result<(), SelectionError> {
        let pos = self
            .schema
            .position_of(key)
            .ok_or_else(|| SelectionError::UnknownLevel(key.to_owned()))?;

        let mut state = self.state.write().await;

        // Idempotence: same value, nothing to do.
        if state.level(pos).value.as_deref() == value {
            return Ok(());
        }

        if let Some(parent_pos) = self.schema.parent_of(pos) {
            if state.level(parent_pos).value.is_none() {
                return Err(SelectionError::ParentUnset {
                    key: key.to_owned(),
                    parent: self.schema.key(parent_pos).to_owned(),
                });
            }
        }

        state.level_mut(pos).value = value.map(str::to_owned);

        // Invalidate the whole subtree; each bump strands any in-flight
        // fetch for that level.
        for descendant in self.schema.descendants_of(pos) {
            state.invalidate(descendant);
        }

        // Clearing a selection stops here: the cascade already restored
        // the "unset parent ⇒ empty descendants" invariant.
        let mut pending = None;
        if let Some(value) = value {
            if let Some(child) = self.schema.child_of(pos) {
                let token = self.mark_loading(&mut state, child);
                pending = Some((child, token, Some(value.to_owned())));
            }
        }

        self.publish(&state);
        drop(state);

        if let Some((child, token, parent_value)) = pending {
            self.spawn_fetch(child, token, parent_value);
        }
        Ok(())
    }

    /// Fetch the root level's own options (parent value is `None`).
    ///
    /// Keeps the current selection; only the option list is refreshed.
    /// Screens call this once when they open.
    pub async fn load_root(&self) {
        let mut state = self.state.write().await;
        let token = self.mark_loading(&mut state, 0);
        self.publish(&state);
        drop(state);

        self.spawn_fetch(0, token, None);
    }

    /// Re-issue the fetch for a level currently in `Error`.
    pub async fn retry(&self, key: &str) -> Result<(), SelectionError> {
        let pos = self
            .schema
            .position_of(key)
            .ok_or_else(|| SelectionError::UnknownLevel(key.to_owned()))?;

        let mut state = self.state.write().await;

        let parent_value = match self.schema.parent_of(pos) {
            Some(parent_pos) => match state.level(parent_pos).value.clone() {
                Some(v) => Some(v),
                None => {
                    return Err(SelectionError::ParentUnset {
                        key: key.to_owned(),
                        parent: self.schema.key(parent_pos).to_owned(),
                    });
                }
            },
            None => None,
        };

        let status = state.level(pos).status;
        if status != LevelStatus::Error {
            return Err(SelectionError::NotRetryable {
                key: key.to_owned(),
                status,
            });
        }

        let token = self.mark_loading(&mut state, pos);
        self.publish(&state);
        drop(state);

        self.spawn_fetch(pos, token, parent_value);
        Ok(())
    }

    /// Every level back to empty `Idle`, all in-flight fetches stranded.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        for pos in 0..self.schema.len() {
            state.invalidate(pos);
        }
        self.publish(&state);
    }

    /// Transition a level to `Loading` and return the epoch token its
    /// fetch must present at commit time. Bumps the epoch first so any
    /// older in-flight fetch for the same level lands stale.
    fn mark_loading(&self, state: &mut SelectionState, pos: usize) -> u64 {
        let level = state.level_mut(pos);
        level.epoch += 1;
        level.status = LevelStatus::Loading;
        level.error = None;
        level.epoch
    }

    fn spawn_fetch(&self, pos: usize, token: u64, parent_value: Option<String>) {
        let schema = Arc::clone(&self.schema);
        let state = Arc::clone(&self.state);
        let notifier = self.notifier.clone();
        let fetcher = Arc::clone(schema.spec(pos).fetcher());

        tokio::spawn(async move {
            let result = fetcher.fetch(parent_value.as_deref()).await;

            let mut state = state.write().await;
            let level = state.level_mut(pos);

            if level.epoch != token {
                // A newer selection superseded this fetch while it was in
                // flight. Discard without touching state.
                tracing::debug!(level = schema.key(pos), token, "discarding stale fetch result");
                return;
            }

            match result {
                Ok(options) => {
                    tracing::debug!(
                        level = schema.key(pos),
                        count = options.len(),
                        "options resolved"
                    );
                    level.options = options;
                    level.status = LevelStatus::Ready;
                    level.error = None;
                }
                Err(err) => {
                    tracing::warn!(level = schema.key(pos), error = %err, "option fetch failed");
                    level.options.clear();
                    level.status = LevelStatus::Error;
                    level.error = Some(err.to_string());
                }
            }

            notifier.send_replace(state.snapshot(&schema));
        });
    }

    fn publish(&self, state: &SelectionState) {
        self.notifier.send_replace(state.snapshot(&self.schema));
    }
}
