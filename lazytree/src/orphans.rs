use std::collections::HashMap;

use crate::node::TreeNode;

/// Child batches waiting for a parent that is not indexed yet.
#[derive(Debug, Clone)]
pub struct OrphanStore<N: TreeNode> {
    groups: HashMap<N::Id, Vec<N>>,
}

impl<N: TreeNode> Default for OrphanStore<N> {
    fn default() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }
}

impl<N: TreeNode> OrphanStore<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `children` until `parent` becomes known.
    ///
    /// Returns the batch previously parked for the same parent, if any.
    pub fn insert(
        &mut self,
        parent: N::Id,
        children: Vec<N>,
    ) -> Option<Vec<N>> {
        self.groups.insert(parent, children)
    }

    /// Remove and return the batch parked for `parent`.
    pub fn remove(&mut self, parent: &N::Id) -> Option<Vec<N>> {
        self.groups.remove(parent)
    }

    pub fn contains(&self, parent: &N::Id) -> bool {
        self.groups.contains_key(parent)
    }

    /// Iterate over the parent ids that still have waiting children.
    pub fn parents(&self) -> impl Iterator<Item = &N::Id> {
        self.groups.keys()
    }

    /// Number of parked batches.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::OrphanStore;
    use crate::node::Node;

    #[test]
    fn given_second_batch_for_same_parent_when_inserted_then_it_replaces_first()
    {
        let mut orphans = OrphanStore::new();

        assert!(orphans.insert(5, vec![Node::<u32>::new(6)]).is_none());
        let previous = orphans.insert(5, vec![Node::new(7)]);

        assert_eq!(previous, Some(vec![Node::new(6)]));
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans.remove(&5), Some(vec![Node::new(7)]));
        assert!(orphans.is_empty());
    }
}
