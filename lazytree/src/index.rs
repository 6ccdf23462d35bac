use std::collections::{HashMap, HashSet};

use crate::node::TreeNode;

/// Indexed node with its children detached into an id list.
#[derive(Debug, Clone)]
struct Entry<N: TreeNode> {
    node: N,
    children: Option<Vec<N::Id>>,
}

/// Flat mapping from node id to node, the source of truth for which nodes
/// are known.
///
/// Nodes are stored without their children; the parent/child relation is
/// kept as id lists so that attaching children never needs a mutable path
/// through the tree. [`NodeIndex::materialize`] rebuilds nested nodes.
#[derive(Debug, Clone)]
pub struct NodeIndex<N: TreeNode> {
    entries: HashMap<N::Id, Entry<N>>,
}

impl<N: TreeNode> Default for NodeIndex<N> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<N: TreeNode> NodeIndex<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `nodes` and all of their resolved descendants.
    ///
    /// Existing entries with the same id are overwritten. Returns the ids of
    /// `nodes` in their original order.
    pub fn index(&mut self, nodes: Vec<N>) -> Vec<N::Id> {
        nodes.into_iter().map(|node| self.insert(node)).collect()
    }

    fn insert(&mut self, mut node: N) -> N::Id {
        let children = node.take_children().map(|nested| self.index(nested));
        let id = node.id().clone();
        self.entries.insert(id.clone(), Entry { node, children });
        id
    }

    /// Index `children` and assign them as the child list of `parent`.
    ///
    /// Returns `false` without indexing anything when `parent` is unknown.
    pub fn attach(&mut self, parent: &N::Id, children: Vec<N>) -> bool {
        if !self.contains(parent) {
            return false;
        }

        let ids = self.index(children);
        if let Some(entry) = self.entries.get_mut(parent) {
            entry.children = Some(ids);
        }
        true
    }

    /// Return whether a node with `id` is known.
    pub fn contains(&self, id: &N::Id) -> bool {
        self.entries.contains_key(id)
    }

    /// Return the node stored under `id`, without its children.
    pub fn get(&self, id: &N::Id) -> Option<&N> {
        self.entries.get(id).map(|entry| &entry.node)
    }

    /// Return the resolved child ids of `id`.
    pub fn children_of(&self, id: &N::Id) -> Option<&[N::Id]> {
        self.entries.get(id)?.children.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild nested nodes for `ids`.
    ///
    /// Unknown ids are skipped. A node already present on the current path
    /// (a cycle introduced by an id collision) is cut off.
    pub fn materialize(&self, ids: &[N::Id]) -> Vec<N> {
        let mut path = HashSet::new();
        self.materialize_level(ids, &mut path)
    }

    fn materialize_level(
        &self,
        ids: &[N::Id],
        path: &mut HashSet<N::Id>,
    ) -> Vec<N> {
        let mut nodes = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(entry) = self.entries.get(id) else {
                continue;
            };

            if !path.insert(id.clone()) {
                log::warn!("node {id:?} is its own ancestor, cutting cycle");
                continue;
            }

            let mut node = entry.node.clone();
            let children = entry
                .children
                .as_deref()
                .map(|child_ids| self.materialize_level(child_ids, path));
            node.set_children(children);
            nodes.push(node);

            path.remove(id);
        }
        nodes
    }
}
