//! The one capability the engine consumes per level.
//!
//! Each level of a chain supplies an [`OptionFetcher`], typically wrapping
//! a network call ("list buildings for site X", "list sub-categories for
//! category Y"). The engine is agnostic to response envelope format —
//! adapting whatever the endpoint returns into `Vec<OptionItem>` is the
//! fetcher's job, since sibling endpoints are known to disagree on
//! envelope shape.

use std::future::Future;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::OptionItem;

/// What a fetch settles to.
pub type FetchResult = Result<Vec<OptionItem>, FetchError>;

/// Async data source for one level's options.
///
/// `parent` is the currently selected value of the parent level, or `None`
/// for the root level. Invariant: the engine only calls a non-root
/// fetcher while its parent value is set.
///
/// Implementations must resolve to `Ok(vec![])` when there is legitimately
/// no data and fail only on genuine transport/server failure.
#[async_trait]
pub trait OptionFetcher: Send + Sync {
    async fn fetch(&self, parent: Option<&str>) -> FetchResult;
}

/// Adapter so screens can supply a plain async closure instead of
/// implementing [`OptionFetcher`] by hand.
///
/// The closure receives an owned `Option<String>` (rather than a borrowed
/// `&str`) so its future does not have to borrow from the call.
///
/// ```
/// use cascade_select::{FetchFn, OptionItem};
///
/// let buildings = FetchFn::new(|site: Option<String>| async move {
///     let site = site.unwrap_or_default();
///     Ok(vec![OptionItem::new(format!("{site}-B1"), "Tower A")])
/// });
/// ```
pub struct FetchFn<F> {
    inner: F,
}

impl<F, Fut> FetchFn<F>
where
    F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<F, Fut> OptionFetcher for FetchFn<F>
where
    F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    async fn fetch(&self, parent: Option<&str>) -> FetchResult {
        (self.inner)(parent.map(str::to_owned)).await
    }
}
