//! Ordered identifier sets with position lookup.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;
use indexmap::set::Iter;

use crate::{GraphError, NodeIdx, Result};

/// Bounds every node or candidate identifier must satisfy.
pub trait NodeKey: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> NodeKey for T {}

/// An ordered sequence of unique identifiers together with the inverse
/// mapping from identifier to position.
///
/// Construction rejects repeats, so `position(get(i)) == Some(i)` holds for
/// every valid `i`.
#[derive(Clone, Debug)]
pub struct IdIndex<T: NodeKey> {
    ids: IndexSet<T>,
}

impl<T: NodeKey> IdIndex<T> {
    /// Builds the index, failing on the first repeated identifier.
    pub fn try_from_iter(ids: impl IntoIterator<Item = T>) -> Result<Self> {
        let ids = ids.into_iter();
        let mut set = IndexSet::with_capacity(ids.size_hint().0);
        for id in ids {
            if set.contains(&id) {
                return Err(GraphError::duplicate_id(&id));
            }
            set.insert(id);
        }
        Ok(Self { ids: set })
    }

    /// Number of identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the index holds no identifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position of `id`, if present.
    pub fn position(&self, id: &T) -> Option<usize> {
        self.ids.get_index_of(id)
    }

    /// Position of `id`, failing with [`GraphError::UnknownNode`] when absent.
    pub fn require(&self, id: &T) -> Result<NodeIdx> {
        self.position(id)
            .map(NodeIdx::from_position)
            .ok_or_else(|| GraphError::unknown_node(id))
    }

    /// Identifier stored at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.ids.get_index(index)
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &T) -> bool {
        self.ids.contains(id)
    }

    /// Identifiers in order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.ids.iter()
    }

    /// Identifiers at the given positions, in the order given.
    ///
    /// Callers validate positions beforehand; an invalid one is reported as
    /// out of range rather than panicking.
    pub fn select(&self, positions: &[usize]) -> Result<Vec<T>> {
        positions
            .iter()
            .map(|&p| {
                self.get(p)
                    .cloned()
                    .ok_or_else(|| GraphError::out_of_range(p, self.len()))
            })
            .collect()
    }
}

// `IndexSet` equality ignores order; identifier sequences compare positionally.
impl<T: NodeKey> PartialEq for IdIndex<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ids.iter().eq(other.ids.iter())
    }
}

impl<T: NodeKey> Eq for IdIndex<T> {}

impl<'a, T: NodeKey> IntoIterator for &'a IdIndex<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Checks a position list against `len`: every entry in range, no repeats.
pub fn validate_positions(positions: &[usize], len: usize) -> Result<()> {
    let mut seen = vec![false; len];
    for &p in positions {
        if p >= len {
            return Err(GraphError::out_of_range(p, len));
        }
        if std::mem::replace(&mut seen[p], true) {
            return Err(GraphError::DuplicateIndex(p));
        }
    }
    Ok(())
}
