use std::sync::Arc;

use crate::adoption::adopt;
use crate::index::NodeIndex;
use crate::node::TreeNode;
use crate::options::LoaderOptions;
use crate::orphans::OrphanStore;

/// Outcome of applying a child batch to a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied<Id> {
    /// The parent was known; children were attached and a new snapshot
    /// was published. `adopted` lists orphan batches resolved as a result.
    Attached { adopted: Vec<Id> },
    /// The parent is unknown; children were parked and nothing was
    /// published.
    Orphaned,
}

/// State of one tree-loading session.
///
/// Owns the node index, the orphan store, the root id list and the
/// published snapshot. All mutation is synchronous; callers serialize
/// access (see [`TreeLoader`](crate::TreeLoader)).
#[derive(Debug)]
pub struct TreeSession<N: TreeNode> {
    index: NodeIndex<N>,
    orphans: OrphanStore<N>,
    roots: Vec<N::Id>,
    snapshot: Arc<Vec<N>>,
    stale: bool,
    revision: u64,
    retain_orphans_on_reload: bool,
}

impl<N: TreeNode> Default for TreeSession<N> {
    fn default() -> Self {
        Self::new(&LoaderOptions::default())
    }
}

impl<N: TreeNode> TreeSession<N> {
    pub fn new(options: &LoaderOptions) -> Self {
        Self {
            index: NodeIndex::new(),
            orphans: OrphanStore::new(),
            roots: Vec::new(),
            snapshot: Arc::new(Vec::new()),
            stale: false,
            revision: 0,
            retain_orphans_on_reload: options.retain_orphans_on_reload,
        }
    }

    // --- Read access ---

    /// Return the published root sequence.
    ///
    /// The nested tree is rebuilt from the index on the first read after a
    /// publication, so a burst of loads costs one rebuild. The returned `Arc`
    /// changes identity after every publication and stays the same otherwise.
    pub fn snapshot(&mut self) -> Arc<Vec<N>> {
        if self.stale {
            self.snapshot = Arc::new(self.index.materialize(&self.roots));
            self.stale = false;
            log::trace!(
                "materialized revision {} with {} known nodes",
                self.revision,
                self.index.len()
            );
        }
        Arc::clone(&self.snapshot)
    }

    /// Number of publications so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn index(&self) -> &NodeIndex<N> {
        &self.index
    }

    pub fn orphans(&self) -> &OrphanStore<N> {
        &self.orphans
    }

    // --- Write access ---

    /// Install a fresh root sequence.
    ///
    /// The node index is rebuilt from `nodes`; parked orphans are kept or
    /// dropped per [`LoaderOptions::retain_orphans_on_reload`] and then
    /// adopted into the new tree. Always publishes.
    ///
    /// Returns the adopted parent ids.
    pub fn replace_roots(&mut self, nodes: Vec<N>) -> Vec<N::Id> {
        let mut index = NodeIndex::new();
        self.roots = index.index(nodes);
        self.index = index;

        if !self.retain_orphans_on_reload && !self.orphans.is_empty() {
            log::debug!(
                "dropping {} orphan batches on root reload",
                self.orphans.len()
            );
            self.orphans.clear();
        }

        let adopted = adopt(&mut self.index, &mut self.orphans);
        self.publish();
        adopted
    }

    /// Apply children fetched for `parent`.
    ///
    /// When `parent` is indexed the children replace its child list, parked
    /// orphans are adopted and a new snapshot is published. Otherwise the
    /// batch is parked until `parent` shows up and the snapshot is left
    /// untouched.
    pub fn attach_children(
        &mut self,
        parent: N::Id,
        children: Vec<N>,
    ) -> Applied<N::Id> {
        if !self.index.contains(&parent) {
            if self.orphans.insert(parent.clone(), children).is_some() {
                log::debug!("replaced parked children of {parent:?}");
            }
            return Applied::Orphaned;
        }

        if self.index.children_of(&parent).is_some() {
            log::debug!("replacing resolved children of {parent:?}");
        }
        self.index.attach(&parent, children);

        let adopted = adopt(&mut self.index, &mut self.orphans);
        self.publish();
        Applied::Attached { adopted }
    }

    fn publish(&mut self) {
        self.stale = true;
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Applied, TreeSession};
    use crate::node::Node;
    use crate::options::LoaderOptions;

    type TestNode = Node<u32>;

    fn node(id: u32) -> TestNode {
        Node::new(id)
    }

    #[test]
    fn given_root_then_children_when_applied_then_snapshot_nests_them() {
        let mut session = TreeSession::default();
        session.replace_roots(vec![node(1)]);

        let applied = session.attach_children(1, vec![node(2), node(3)]);

        assert_eq!(applied, Applied::Attached { adopted: vec![] });
        assert_eq!(
            *session.snapshot(),
            vec![node(1).with_children(vec![node(2), node(3)])]
        );

        session.attach_children(3, vec![node(4)]);
        assert_eq!(
            *session.snapshot(),
            vec![node(1).with_children(vec![
                node(2),
                node(3).with_children(vec![node(4)]),
            ])]
        );
    }

    #[test]
    fn given_unknown_parent_when_children_applied_then_snapshot_is_unchanged()
    {
        let mut session = TreeSession::default();
        session.replace_roots(vec![node(1)]);
        let before = session.snapshot();
        let revision = session.revision();

        let applied = session.attach_children(5, vec![node(6)]);

        assert_eq!(applied, Applied::Orphaned);
        assert!(Arc::ptr_eq(&before, &session.snapshot()));
        assert_eq!(session.revision(), revision);
        assert!(session.orphans().contains(&5));
        assert!(!session.index().contains(&6));
    }

    #[test]
    fn given_orphan_when_parent_arrives_then_orphan_is_adopted() {
        let mut session = TreeSession::default();
        session.replace_roots(vec![node(1)]);
        session.attach_children(5, vec![node(6)]);

        let applied = session.attach_children(1, vec![node(5)]);

        assert_eq!(applied, Applied::Attached { adopted: vec![5] });
        assert!(session.orphans().is_empty());
        assert_eq!(
            *session.snapshot(),
            vec![node(1).with_children(vec![
                node(5).with_children(vec![node(6)])
            ])]
        );
    }

    #[test]
    fn given_known_parent_when_children_applied_then_new_snapshot_is_published()
     {
        let mut session = TreeSession::default();
        session.replace_roots(vec![node(1)]);
        let before = session.snapshot();

        session.attach_children(1, vec![node(2)]);

        assert!(!Arc::ptr_eq(&before, &session.snapshot()));
        assert_eq!(session.revision(), 2);
    }

    #[test]
    fn given_orphans_parked_before_root_when_root_loaded_then_they_are_adopted()
     {
        let mut session = TreeSession::default();
        session.attach_children(1, vec![node(2)]);
        session.attach_children(2, vec![node(3)]);

        let adopted = session.replace_roots(vec![node(1)]);

        assert_eq!(adopted.len(), 2);
        assert_eq!(
            *session.snapshot(),
            vec![node(1).with_children(vec![
                node(2).with_children(vec![node(3)])
            ])]
        );
    }

    #[test]
    fn given_orphans_dropped_on_reload_when_root_loaded_then_store_is_cleared()
    {
        let options = LoaderOptions {
            retain_orphans_on_reload: false,
            ..LoaderOptions::default()
        };
        let mut session = TreeSession::new(&options);
        session.attach_children(1, vec![node(2)]);

        let adopted = session.replace_roots(vec![node(1)]);

        assert!(adopted.is_empty());
        assert!(session.orphans().is_empty());
        assert_eq!(*session.snapshot(), vec![node(1)]);
    }

    #[test]
    fn given_root_reload_when_applied_then_previous_nodes_are_forgotten() {
        let mut session = TreeSession::default();
        session.replace_roots(vec![node(1).with_children(vec![node(2)])]);

        session.replace_roots(vec![node(7)]);

        assert!(!session.index().contains(&1));
        assert!(!session.index().contains(&2));
        assert_eq!(*session.snapshot(), vec![node(7)]);
        assert_eq!(session.revision(), 2);
    }

    #[test]
    fn given_no_publication_between_reads_then_snapshot_is_shared() {
        let mut session = TreeSession::default();
        session.replace_roots(vec![node(1)]);

        let first = session.snapshot();
        let second = session.snapshot();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn given_unread_publications_when_read_then_latest_tree_is_returned() {
        let mut session = TreeSession::default();
        session.replace_roots(vec![node(1)]);
        session.attach_children(1, vec![node(2)]);
        session.attach_children(2, vec![node(3)]);

        assert_eq!(session.revision(), 3);
        assert_eq!(
            *session.snapshot(),
            vec![node(1).with_children(vec![
                node(2).with_children(vec![node(3)])
            ])]
        );
    }
}
