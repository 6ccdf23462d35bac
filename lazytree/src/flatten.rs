use crate::node::TreeNode;

/// Flattened representation of one node in a snapshot.
pub struct FlattenedNode<'a, N: TreeNode> {
    /// Zero-based tree depth (`0` for root-level rows).
    pub depth: usize,
    /// Borrowed source node.
    pub node: &'a N,
    /// Ids from the root down to this node, inclusive.
    pub path: Vec<N::Id>,
}

/// Flatten a tree into a depth-first list of rows.
///
/// Sibling order is preserved. Children are visited only for nodes whose
/// child set is resolved.
pub fn flatten_tree<N: TreeNode>(nodes: &[N]) -> Vec<FlattenedNode<'_, N>> {
    let mut entries = Vec::new();
    let mut path = Vec::new();
    for node in nodes {
        push_node(node, 0, &mut path, &mut entries);
    }
    entries
}

fn push_node<'a, N: TreeNode>(
    node: &'a N,
    depth: usize,
    path: &mut Vec<N::Id>,
    entries: &mut Vec<FlattenedNode<'a, N>>,
) {
    path.push(node.id().clone());
    entries.push(FlattenedNode {
        depth,
        node,
        path: path.clone(),
    });

    if let Some(children) = node.children() {
        for child in children {
            push_node(child, depth + 1, path, entries);
        }
    }

    path.pop();
}
