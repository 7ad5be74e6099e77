use std::collections::BTreeSet;

/// Identifiers freed by deletion, handed back out smallest first.
///
/// An empty pool means new records take whatever id storage assigns next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierPool {
    recycled: BTreeSet<i64>,
}

impl IdentifierPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the smallest recycled id, or `None` to defer to auto-assignment.
    pub fn allocate(&mut self) -> Option<i64> {
        self.recycled.pop_first()
    }

    /// Returns `false` if the id was already waiting for reuse.
    pub fn release(&mut self, id: i64) -> bool {
        self.recycled.insert(id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.recycled.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.recycled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recycled.is_empty()
    }

    /// Ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.recycled.iter().copied()
    }
}

impl FromIterator<i64> for IdentifierPool {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        IdentifierPool {
            recycled: iter.into_iter().collect(),
        }
    }
}
