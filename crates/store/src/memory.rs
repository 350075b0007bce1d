//! In-memory store for arrays built in code

// standard library
use std::collections::BTreeMap;

// crate modules
use crate::array::Array;
use crate::error::{Error, Result};
use crate::resolve::{normalise_path, split_path, Node, Resolve};

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Group(BTreeMap<String, Entry>),
    Dataset(Array),
}

/// A hierarchical store held entirely in memory
///
/// Useful for tests, or for feeding arrays produced elsewhere through the same
/// extraction pipeline as a file. Intermediate groups are created implicitly.
///
/// ```rust
/// # use mictools_store::{Array, MemoryStore, Node, Resolve};
/// let mut store = MemoryStore::new();
/// store.insert("/CellFeatureData/Phases", Array::from_ints(vec![0, 1, 2])).unwrap();
/// store.insert("/CellFeatureData/Active", Array::from_ints(vec![0, 1, 1])).unwrap();
///
/// let node = store.node("/CellFeatureData").unwrap();
/// assert_eq!(node, Node::Group(vec!["Active".into(), "Phases".into()]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    root: BTreeMap<String, Entry>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dataset at `path`, replacing anything already there
    ///
    /// Fails with [Error::PathConflict] if a parent component of `path` is
    /// already a dataset.
    pub fn insert(&mut self, path: &str, array: Array) -> Result<()> {
        let parts = split_path(path);
        let Some((name, parents)) = parts.split_last() else {
            return Err(Error::PathConflict {
                path: path.to_string(),
            });
        };

        let mut group = &mut self.root;
        for part in parents {
            let entry = group
                .entry(part.to_string())
                .or_insert_with(|| Entry::Group(BTreeMap::new()));
            group = match entry {
                Entry::Group(children) => children,
                Entry::Dataset(_) => {
                    return Err(Error::PathConflict {
                        path: path.to_string(),
                    })
                }
            };
        }

        group.insert(name.to_string(), Entry::Dataset(array));
        Ok(())
    }

    /// Chained version of [MemoryStore::insert]
    pub fn with(mut self, path: &str, array: Array) -> Result<Self> {
        self.insert(path, array)?;
        Ok(self)
    }
}

impl Resolve for MemoryStore {
    fn node(&self, path: &str) -> Result<Node> {
        let not_found = || Error::PathNotFound {
            path: normalise_path(path),
        };

        let mut children = &self.root;
        let mut current: Option<&Entry> = None;
        for part in split_path(path) {
            // datasets have no children
            if let Some(Entry::Dataset(_)) = current {
                return Err(not_found());
            }
            let entry = children.get(part).ok_or_else(not_found)?;
            if let Entry::Group(inner) = entry {
                children = inner;
            }
            current = Some(entry);
        }

        Ok(match current {
            Some(Entry::Dataset(array)) => Node::Dataset(array.clone()),
            Some(Entry::Group(inner)) => Node::Group(inner.keys().cloned().collect()),
            None => Node::Group(self.root.keys().cloned().collect()),
        })
    }
}
