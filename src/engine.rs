//! Public façade consumed by screens.
//!
//! This is the only surface a screen touches: it hides epochs and fetch
//! orchestration entirely. The engine is cheap to clone (everything
//! inside is shared), so handing one to a spawned task or a child widget
//! is fine; all clones drive the same chain.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::SelectionError;
use crate::resolver::DependencyResolver;
use crate::schema::ChainSchema;
use crate::state::ChainSnapshot;

/// Engine for one dependent-selection chain.
///
/// Create one per screen instance (e.g. per opened dialog) and drop it
/// when the screen closes — there is no persistence and no global
/// registry.
///
/// ```no_run
/// use std::sync::Arc;
/// use cascade_select::{ChainSchema, FetchFn, LevelSpec, OptionItem, SelectionEngine};
///
/// # async fn demo() -> Result<(), cascade_select::SelectionError> {
/// let schema = ChainSchema::build(vec![
///     LevelSpec::root(
///         "site",
///         Arc::new(FetchFn::new(|_| async { Ok(vec![OptionItem::new("S1", "HQ")]) })),
///     ),
///     LevelSpec::child(
///         "building",
///         "site",
///         Arc::new(FetchFn::new(|site: Option<String>| async move {
///             let _ = site; // call the buildings endpoint here
///             Ok(vec![OptionItem::new("B1", "Tower A")])
///         })),
///     ),
/// ])
/// .expect("static schema");
///
/// let engine = SelectionEngine::new(schema);
/// let updates = engine.subscribe();
/// engine.load_root().await;
/// engine.set_selection("site", Some("S1")).await?;
/// // updates.changed().await / updates.borrow() drive the re-render.
/// # Ok(())
/// # }
/// ```
pub struct SelectionEngine {
    resolver: Arc<DependencyResolver>,
}

impl SelectionEngine {
    /// Build an engine over a validated schema.
    pub fn new(schema: ChainSchema) -> Self {
        Self {
            resolver: Arc::new(DependencyResolver::new(schema)),
        }
    }

    /// Select `value` at `level_key`, cascade-clearing every descendant
    /// and fetching the immediate child's options.
    ///
    /// Selecting the current value again is a no-op. `None` clears the
    /// level and its subtree without issuing a fetch.
    ///
    /// # Errors
    ///
    /// [`SelectionError::UnknownLevel`] for a key outside the schema;
    /// [`SelectionError::ParentUnset`] when selecting on a non-root level
    /// whose parent has no value. State is untouched in both cases.
    pub async fn set_selection(
        &self,
        level_key: &str,
        value: Option<&str>,
    ) -> Result<(), SelectionError> {
        self.resolver.set_selection(level_key, value).await
    }

    /// Clear every level back to `Idle` with no value. Any in-flight
    /// fetch result will be discarded on arrival.
    pub async fn reset(&self) {
        self.resolver.reset().await
    }

    /// Fetch the root level's option list (the root's fetcher is invoked
    /// with `None`). Call once when the screen opens.
    pub async fn load_root(&self) {
        self.resolver.load_root().await
    }

    /// Re-issue the fetch for a level that is currently in `Error`.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NotRetryable`] unless the level's status is
    /// `Error`; [`SelectionError::ParentUnset`] / `UnknownLevel` as for
    /// `set_selection`.
    pub async fn retry(&self, level_key: &str) -> Result<(), SelectionError> {
        self.resolver.retry(level_key).await
    }

    /// Read-only copy of the current chain state.
    pub async fn snapshot(&self) -> ChainSnapshot {
        self.resolver.snapshot().await
    }

    /// The contiguous `(key, value)` selections from the root down.
    pub async fn selection_path(&self) -> Vec<(String, String)> {
        self.resolver.snapshot().await.selection_path()
    }

    /// Subscribe to chain changes.
    ///
    /// The receiver yields a fresh [`ChainSnapshot`] on every state
    /// mutation; `borrow()` always holds the latest one. Dropping the
    /// receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<ChainSnapshot> {
        self.resolver.subscribe()
    }
}

impl Clone for SelectionEngine {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
        }
    }
}
