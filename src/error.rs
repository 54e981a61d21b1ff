//! Error taxonomy for the selection engine.
//!
//! Three tiers with different propagation rules:
//! - [`SchemaError`] — fatal, construction-time. The engine refuses to be
//!   built on a malformed chain; never a runtime condition to recover from.
//! - [`SelectionError`] — recoverable, programmer-facing. Returned
//!   synchronously from the façade without mutating state, so misuse is
//!   assertable in tests.
//! - [`FetchError`] — recoverable, runtime. Produced by a level's fetcher;
//!   never thrown across the async boundary, it lands on the affected
//!   level's snapshot as `status = Error` plus a message.

use thiserror::Error;

use crate::types::LevelStatus;

/// A malformed [`ChainSchema`](crate::schema::ChainSchema) configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema declares no levels")]
    Empty,

    #[error("duplicate level key `{0}`")]
    DuplicateKey(String),

    #[error("first level `{key}` must be the root but declares parent `{parent}`")]
    RootHasParent { key: String, parent: String },

    #[error("level `{0}` declares no parent; only the first level may be the root")]
    DuplicateRoot(String),

    #[error("level `{key}` must chain from `{expected}`, not `{parent}`")]
    BrokenChain {
        key: String,
        parent: String,
        expected: String,
    },
}

/// Rejected façade call. State is untouched whenever one of these is
/// returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown level `{0}`")]
    UnknownLevel(String),

    #[error("cannot select `{key}`: parent level `{parent}` has no value")]
    ParentUnset { key: String, parent: String },

    #[error("level `{key}` is {status:?}; only Error levels can be retried")]
    NotRetryable { key: String, status: LevelStatus },
}

/// Failure of a level's option fetch.
///
/// Fetchers must resolve to an *empty list* when there is legitimately no
/// data; a `FetchError` means genuine transport or server failure (or a
/// response envelope the adapter could not decode).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a usable response (network, timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with an error for this request.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The response arrived but its envelope could not be adapted into
    /// option items.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
