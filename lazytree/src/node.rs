use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Trait implemented by node records that can be assembled into a tree.
///
/// `children` distinguishes two states:
/// - `None`: the child set has not been fetched yet;
/// - `Some(..)`: the child set is resolved, possibly empty.
pub trait TreeNode: Clone {
    /// Identifier, unique across the whole tree.
    type Id: Clone + Eq + Hash + Debug;

    /// Identifier of this node.
    fn id(&self) -> &Self::Id;

    /// Resolved children, if any.
    fn children(&self) -> Option<&[Self]>;

    /// Detach and return the children, leaving the node unresolved.
    fn take_children(&mut self) -> Option<Vec<Self>>;

    /// Replace the children of this node.
    fn set_children(&mut self, children: Option<Vec<Self>>);
}

/// Generic node record carrying an identifier and an arbitrary payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node<Id, T = ()> {
    pub id: Id,
    #[serde(default)]
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node<Id, T>>>,
}

impl<Id, T: Default> Node<Id, T> {
    /// Create an unresolved node with a default payload.
    pub fn new(id: Id) -> Self {
        Self::with_data(id, T::default())
    }
}

impl<Id, T> Node<Id, T> {
    /// Create an unresolved node carrying `data`.
    pub fn with_data(id: Id, data: T) -> Self {
        Self {
            id,
            data,
            children: None,
        }
    }

    /// Mark the node resolved with the given children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node<Id, T>>) -> Self {
        self.children = Some(children);
        self
    }
}

impl<Id, T> TreeNode for Node<Id, T>
where
    Id: Clone + Eq + Hash + Debug,
    T: Clone,
{
    type Id = Id;

    fn id(&self) -> &Id {
        &self.id
    }

    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    fn take_children(&mut self) -> Option<Vec<Self>> {
        self.children.take()
    }

    fn set_children(&mut self, children: Option<Vec<Self>>) {
        self.children = children;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Node, TreeNode};

    #[test]
    fn given_json_without_children_when_deserialized_then_node_is_unresolved()
    {
        let node: Node<u32, String> =
            serde_json::from_value(json!({ "id": 7, "data": "docs" }))
                .expect("node should deserialize");

        assert_eq!(node.id, 7);
        assert_eq!(node.data, "docs");
        assert!(node.children().is_none());
    }

    #[test]
    fn given_empty_children_when_serialized_then_resolved_state_is_kept() {
        let node: Node<u32> = Node::new(1).with_children(Vec::new());

        let value = serde_json::to_value(&node).expect("node should serialize");

        assert_eq!(value, json!({ "id": 1, "data": null, "children": [] }));
    }

    #[test]
    fn take_children_leaves_node_unresolved() {
        let mut node: Node<u32> =
            Node::new(1).with_children(vec![Node::new(2)]);

        let children = node.take_children().expect("children were set");

        assert_eq!(children.len(), 1);
        assert!(node.children.is_none());
    }
}
