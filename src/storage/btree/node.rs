use crate::common::types::RowId;

/// Handle of a node inside its tree's arena.
///
/// Parents own children through these handles; a leaf's `next` uses the same
/// handle type but is only a traversal link, never an ownership edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Clone, Debug)]
pub struct LeafNode<K> {
    pub keys: Vec<K>,
    pub values: Vec<Vec<RowId>>, // duplicates grouped, aligned with keys
    pub next: Option<NodeId>,    // right sibling
}

#[derive(Clone, Debug)]
pub struct InternalNode<K> {
    pub keys: Vec<K>,
    pub children: Vec<NodeId>, // children.len() = keys.len() + 1
}

#[derive(Clone, Debug)]
pub enum Node<K> {
    Internal(InternalNode<K>),
    Leaf(LeafNode<K>),
}

impl<K> Node<K> {
    pub fn empty_leaf() -> Self {
        Node::Leaf(LeafNode {
            keys: Vec::new(),
            values: Vec::new(),
            next: None,
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn keys(&self) -> &[K] {
        match self {
            Node::Internal(i) => &i.keys,
            Node::Leaf(l) => &l.keys,
        }
    }

    /// Child at `offset`. Calling this on a leaf is a bug in the caller.
    pub fn child_at(&self, offset: usize) -> NodeId {
        match self {
            Node::Internal(i) => i.children[offset],
            Node::Leaf(_) => panic!("BUG: child_at({offset}) called on a leaf node"),
        }
    }

    /// Right sibling in key order, `None` at the end of the chain.
    /// Calling this on an internal node is a bug in the caller.
    pub fn next_leaf(&self) -> Option<NodeId> {
        match self {
            Node::Leaf(l) => l.next,
            Node::Internal(_) => panic!("BUG: next_leaf() called on an internal node"),
        }
    }

    pub(crate) fn as_leaf(&self) -> &LeafNode<K> {
        match self {
            Node::Leaf(l) => l,
            Node::Internal(_) => panic!("BUG: expected a leaf node"),
        }
    }

    pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode<K> {
        match self {
            Node::Leaf(l) => l,
            Node::Internal(_) => panic!("BUG: expected a leaf node"),
        }
    }

    pub(crate) fn as_internal(&self) -> &InternalNode<K> {
        match self {
            Node::Internal(i) => i,
            Node::Leaf(_) => panic!("BUG: expected an internal node"),
        }
    }

    pub(crate) fn as_internal_mut(&mut self) -> &mut InternalNode<K> {
        match self {
            Node::Internal(i) => i,
            Node::Leaf(_) => panic!("BUG: expected an internal node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn internal() -> Node<i64> {
        Node::Internal(InternalNode {
            keys: vec![10],
            children: vec![NodeId(1), NodeId(2)],
        })
    }

    #[test]
    fn child_at_on_internal() {
        let node = internal();
        assert_eq!(node.child_at(0), NodeId(1));
        assert_eq!(node.child_at(1), NodeId(2));
        assert!(!node.is_leaf());
    }

    #[test]
    fn next_leaf_on_leaf() {
        let mut node: Node<i64> = Node::empty_leaf();
        assert_eq!(node.next_leaf(), None);

        node.as_leaf_mut().next = Some(NodeId(7));
        assert_eq!(node.next_leaf(), Some(NodeId(7)));
        assert!(node.keys().is_empty());
    }

    #[test]
    #[should_panic(expected = "called on a leaf node")]
    fn child_at_on_leaf_panics() {
        let node: Node<i64> = Node::empty_leaf();
        node.child_at(0);
    }

    #[test]
    #[should_panic(expected = "called on an internal node")]
    fn next_leaf_on_internal_panics() {
        internal().next_leaf();
    }
}
