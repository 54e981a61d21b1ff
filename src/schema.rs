//! Static chain description and its construction-time validation.
//!
//! A schema is an ordered list of [`LevelSpec`]s where level 0 is the root
//! and every later level chains from the level declared immediately before
//! it. With exactly one root, exactly one parent per non-root level, and
//! at most one child per level, a dependent-selection chain is always
//! linear — so declaration order *is* chain order, and anything else is a
//! configuration error caught here, never at runtime.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::error::SchemaError;
use crate::fetch::OptionFetcher;

/// Static description of one chain step: a key, its parent key (or none,
/// for the root), and the data source for its options.
#[derive(Clone)]
pub struct LevelSpec {
    key: String,
    parent_key: Option<String>,
    fetcher: Arc<dyn OptionFetcher>,
}

impl LevelSpec {
    /// The root level of a chain. Its fetcher is invoked with `None`.
    pub fn root(key: impl Into<String>, fetcher: Arc<dyn OptionFetcher>) -> Self {
        Self {
            key: key.into(),
            parent_key: None,
            fetcher,
        }
    }

    /// A level whose options depend on the value selected at `parent`.
    pub fn child(
        key: impl Into<String>,
        parent: impl Into<String>,
        fetcher: Arc<dyn OptionFetcher>,
    ) -> Self {
        Self {
            key: key.into(),
            parent_key: Some(parent.into()),
            fetcher,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.parent_key.as_deref()
    }

    pub(crate) fn fetcher(&self) -> &Arc<dyn OptionFetcher> {
        &self.fetcher
    }
}

impl fmt::Debug for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelSpec")
            .field("key", &self.key)
            .field("parent_key", &self.parent_key)
            .finish_non_exhaustive()
    }
}

/// Validated, ordered collection of [`LevelSpec`]s forming a single
/// acyclic parent chain. Index = chain position.
#[derive(Clone)]
pub struct ChainSchema {
    levels: Vec<LevelSpec>,
    index: HashMap<String, usize>,
}

impl ChainSchema {
    /// Validate and build a schema.
    ///
    /// Rejects: an empty list, duplicate keys, a first level that declares
    /// a parent, a later level that declares none, and any level whose
    /// parent is not the level declared immediately before it (which
    /// subsumes forward, self, and cyclic references).
    pub fn build(levels: Vec<LevelSpec>) -> Result<Self, SchemaError> {
        if levels.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut index = HashMap::with_capacity(levels.len());
        for (pos, spec) in levels.iter().enumerate() {
            if index.insert(spec.key.clone(), pos).is_some() {
                return Err(SchemaError::DuplicateKey(spec.key.clone()));
            }

            match (pos, spec.parent_key.as_deref()) {
                (0, None) => {}
                (0, Some(parent)) => {
                    return Err(SchemaError::RootHasParent {
                        key: spec.key.clone(),
                        parent: parent.to_owned(),
                    });
                }
                (_, None) => {
                    return Err(SchemaError::DuplicateRoot(spec.key.clone()));
                }
                (_, Some(parent)) => {
                    let expected = &levels[pos - 1].key;
                    if parent != expected {
                        return Err(SchemaError::BrokenChain {
                            key: spec.key.clone(),
                            parent: parent.to_owned(),
                            expected: expected.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { levels, index })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level keys in chain order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.key.as_str())
    }

    pub fn key(&self, pos: usize) -> &str {
        &self.levels[pos].key
    }

    /// Chain position of a level key.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Position of the parent level, `None` for the root.
    pub fn parent_of(&self, pos: usize) -> Option<usize> {
        pos.checked_sub(1)
    }

    /// Position of the immediate child level, if any.
    pub fn child_of(&self, pos: usize) -> Option<usize> {
        let next = pos + 1;
        (next < self.levels.len()).then_some(next)
    }

    /// Positions strictly downstream of `pos`, in chain order.
    pub fn descendants_of(&self, pos: usize) -> Range<usize> {
        pos + 1..self.levels.len()
    }

    pub(crate) fn spec(&self, pos: usize) -> &LevelSpec {
        &self.levels[pos]
    }
}

impl fmt::Debug for ChainSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainSchema")
            .field("levels", &self.levels)
            .finish()
    }
}
