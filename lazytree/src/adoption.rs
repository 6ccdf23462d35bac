use crate::index::NodeIndex;
use crate::node::TreeNode;
use crate::orphans::OrphanStore;

/// Attach every orphan batch whose parent is now indexed.
///
/// Runs full passes over the store until a pass adopts nothing, so chains
/// of orphans (a grandchild batch waiting on a child batch waiting on the
/// parent) resolve within a single call. Each productive pass shrinks the
/// store, which bounds the number of passes by its initial size.
///
/// Returns the adopted parent ids in adoption order.
pub fn adopt<N: TreeNode>(
    index: &mut NodeIndex<N>,
    orphans: &mut OrphanStore<N>,
) -> Vec<N::Id> {
    let mut adopted = Vec::new();
    let mut passes = 0usize;

    while !orphans.is_empty() {
        let before = orphans.len();
        passes += 1;

        let ready: Vec<N::Id> = orphans
            .parents()
            .filter(|parent| index.contains(parent))
            .cloned()
            .collect();

        for parent in ready {
            if let Some(children) = orphans.remove(&parent) {
                index.attach(&parent, children);
                adopted.push(parent);
            }
        }

        if orphans.len() == before {
            break;
        }
    }

    if !adopted.is_empty() {
        log::debug!(
            "adopted {} orphan batches in {passes} passes, {} left waiting",
            adopted.len(),
            orphans.len()
        );
    }

    adopted
}
