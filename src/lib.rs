//! Cascading dependent-selection engine.
//!
//! One correct, reusable implementation of the pattern every admin screen
//! re-invents by hand: a chain of selectable levels (site → building →
//! wing, category → sub-category, …) where each level's options depend on
//! the value chosen above it, options arrive asynchronously, and changing
//! an upstream value must invalidate everything downstream — without ever
//! letting a slow, superseded response overwrite a newer selection.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SelectionEngine (façade)                                   │
//! │  set_selection / reset / load_root / retry / snapshot /     │
//! │  subscribe                                                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  DependencyResolver                                         │
//! │  idempotence · parent guard · cascade-clear ·               │
//! │  epoch-token commit (stale results discarded)               │
//! ├──────────────────────────┬──────────────────────────────────┤
//! │  ChainSchema             │  SelectionState                  │
//! │  LevelSpec chain,        │  value / options / status /      │
//! │  validated at build      │  epoch per level, single-owner   │
//! └──────────────────────────┴──────────────────────────────────┘
//!              │                            │
//!              ▼                            ▼
//!   OptionFetcher per level      watch::Receiver<ChainSnapshot>
//!   (supplied by the screen)     (consumed by the screen)
//! ```
//!
//! ## Correctness guarantee
//!
//! Fetch *issuance* is never serialized — a user may change the root three
//! times before the first child fetch returns — but fetch *commit* is:
//! every invalidation bumps the level's epoch, every fetch carries the
//! epoch it was issued under, and a result only lands while the two still
//! match. The visible state after any burst of selections and network
//! settlement is therefore always consistent with the last selection per
//! level, regardless of response arrival order.

pub mod engine;
pub mod error;
pub mod fetch;
pub mod schema;
pub mod state;
pub mod types;

mod resolver;

pub use engine::SelectionEngine;
pub use error::{FetchError, SchemaError, SelectionError};
pub use fetch::{FetchFn, FetchResult, OptionFetcher};
pub use schema::{ChainSchema, LevelSpec};
pub use state::{ChainSnapshot, LevelSnapshot};
pub use types::{LevelStatus, OptionItem};
