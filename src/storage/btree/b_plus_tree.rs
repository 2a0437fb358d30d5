use std::{collections::HashSet, ops::Bound};

use crate::{
    common::types::RowId,
    storage::btree::node::{InternalNode, LeafNode, Node, NodeId},
};

/// In-memory B+Tree mapping keys to the row ids that hold them.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. Every node
/// except the root is reachable from exactly one parent; leaves are also
/// chained left to right through `next` for ordered scans. A key appears in
/// exactly one leaf, with all of its row ids grouped under it.
#[derive(Clone, Debug)]
pub struct BPlusTree<K> {
    order: usize,
    root: NodeId,
    nodes: Vec<Node<K>>,
    free: Vec<NodeId>,
    len: usize,
}

impl<K: Ord + Clone> BPlusTree<K> {
    pub fn new(order: usize) -> Self {
        assert!(order >= 3, "B+Tree order must be ≥ 3");

        Self {
            order,
            root: NodeId(0),
            nodes: vec![Node::empty_leaf()],
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.0]
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Row ids stored under `key`, or `None` if the key was never inserted
    /// (or has been deleted).
    pub fn search(&self, key: &K) -> Option<&[RowId]> {
        let leaf = self.node(self.find_leaf(key)).as_leaf();

        leaf.keys
            .binary_search(key)
            .ok()
            .map(|i| leaf.values[i].as_slice())
    }

    /// Row ids of every key between `start` and `end`, in key order.
    ///
    /// `start > end` yields an empty result rather than an error.
    pub fn range_query(
        &self,
        start: &K,
        start_inclusive: bool,
        end: &K,
        end_inclusive: bool,
    ) -> Vec<RowId> {
        if start > end {
            return Vec::new();
        }

        let lower = if start_inclusive {
            Bound::Included(start)
        } else {
            Bound::Excluded(start)
        };
        let upper = if end_inclusive {
            Bound::Included(end)
        } else {
            Bound::Excluded(end)
        };

        self.scan(lower, upper)
    }

    /// Ordered scan over arbitrary bounds. Walks the leaf chain from the
    /// leaf that would hold the lower bound and stops at the first key past
    /// the upper bound.
    pub fn scan(&self, lower: Bound<&K>, upper: Bound<&K>) -> Vec<RowId> {
        let mut out = Vec::new();
        let mut id = match lower {
            Bound::Included(k) | Bound::Excluded(k) => self.find_leaf(k),
            Bound::Unbounded => self.leftmost_leaf(),
        };

        loop {
            let node = self.node(id);
            let leaf = node.as_leaf();

            for (k, rids) in leaf.keys.iter().zip(&leaf.values) {
                let past_end = match upper {
                    Bound::Included(end) => k > end,
                    Bound::Excluded(end) => k >= end,
                    Bound::Unbounded => false,
                };
                if past_end {
                    return out;
                }

                let after_start = match lower {
                    Bound::Included(start) => k >= start,
                    Bound::Excluded(start) => k > start,
                    Bound::Unbounded => true,
                };
                if after_start {
                    out.extend_from_slice(rids);
                }
            }

            match node.next_leaf() {
                Some(next) => id = next,
                None => return out,
            }
        }
    }

    /// Adds one occurrence of `key` for `row_id`.
    pub fn insert(&mut self, key: K, row_id: RowId) {
        if let Some((sep, right)) = self.insert_recursive(self.root, key, row_id) {
            // Root split → grow tree height
            let new_root = InternalNode {
                keys: vec![sep],
                children: vec![self.root, right],
            };

            self.root = self.alloc(Node::Internal(new_root));
            tracing::trace!(root = ?self.root, "root split, height grew");
        }
    }

    /// Removes `key` with all of its row ids. Returns whether it was present.
    pub fn delete(&mut self, key: &K) -> bool {
        let (removed, _) = self.delete_recursive(self.root, key);
        if !removed {
            return false;
        }
        self.len -= 1;

        // Collapse a root left with a single child
        loop {
            let collapse = match self.node(self.root) {
                Node::Internal(i) if i.keys.is_empty() => Some(i.children[0]),
                _ => None,
            };

            match collapse {
                Some(child) => {
                    let old = self.root;
                    self.root = child;
                    self.release(old);
                    tracing::trace!(root = ?self.root, "root collapsed, height shrank");
                }
                None => break,
            }
        }

        #[cfg(debug_assertions)]
        self.check_invariants();

        true
    }

    /// Every distinct key in ascending order, read along the leaf chain.
    pub fn get_all_keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Number of internal levels above the leaves; 0 for a single-leaf tree.
    pub fn get_height(&self) -> usize {
        let mut height = 0;
        let mut node = self.node(self.root);

        while !node.is_leaf() {
            node = self.node(node.child_at(0));
            height += 1;
        }
        height
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tree: self,
            leaf: Some(self.leftmost_leaf()),
            pos: 0,
        }
    }
}

impl<K: Ord + Clone> BPlusTree<K> {
    fn max_keys(&self) -> usize {
        self.order - 1
    }

    /// ceil(order / 2) - 1
    fn min_keys(&self) -> usize {
        (self.order - 1) / 2
    }

    /// First child whose range can hold `key`: keys equal to a separator go right.
    fn child_index(keys: &[K], key: &K) -> usize {
        match keys.binary_search(key) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, node: Node<K>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id.0] = Node::empty_leaf();
        self.free.push(id);
    }

    fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<K>, &mut Node<K>) {
        assert_ne!(a, b, "BUG: sibling pair aliases one node");

        if a.0 < b.0 {
            let (l, r) = self.nodes.split_at_mut(b.0);
            (&mut l[a.0], &mut r[0])
        } else {
            let (l, r) = self.nodes.split_at_mut(a.0);
            (&mut r[0], &mut l[b.0])
        }
    }

    fn find_leaf(&self, key: &K) -> NodeId {
        let mut id = self.root;

        loop {
            let node = self.node(id);
            if node.is_leaf() {
                return id;
            }
            id = node.child_at(Self::child_index(node.keys(), key));
        }
    }

    fn leftmost_leaf(&self) -> NodeId {
        let mut id = self.root;

        while !self.node(id).is_leaf() {
            id = self.node(id).child_at(0);
        }
        id
    }

    fn insert_recursive(&mut self, id: NodeId, key: K, row_id: RowId) -> Option<(K, NodeId)> {
        let max_keys = self.max_keys();

        match self.node_mut(id) {
            Node::Leaf(leaf) => {
                match leaf.keys.binary_search(&key) {
                    Ok(i) => {
                        leaf.values[i].push(row_id);
                        return None;
                    }
                    Err(i) => {
                        leaf.keys.insert(i, key);
                        leaf.values.insert(i, vec![row_id]);
                    }
                }

                let overflow = leaf.keys.len() > max_keys;
                self.len += 1;

                overflow.then(|| self.split_leaf(id))
            }

            Node::Internal(internal) => {
                let idx = Self::child_index(&internal.keys, &key);
                let child = internal.children[idx];

                let (sep, right) = self.insert_recursive(child, key, row_id)?;

                let internal = self.node_mut(id).as_internal_mut();
                internal.keys.insert(idx, sep);
                internal.children.insert(idx + 1, right);

                let overflow = internal.keys.len() > max_keys;
                overflow.then(|| self.split_internal(id))
            }
        }
    }

    /// Lower ceil(n/2) keys stay; the first key of the new right leaf is
    /// copied up as separator.
    fn split_leaf(&mut self, id: NodeId) -> (K, NodeId) {
        let leaf = self.node_mut(id).as_leaf_mut();

        let split_at = leaf.keys.len().div_ceil(2);
        let keys = leaf.keys.split_off(split_at);
        let values = leaf.values.split_off(split_at);
        let next = leaf.next.take();

        let separator = keys[0].clone();
        let new_id = self.alloc(Node::Leaf(LeafNode { keys, values, next }));
        self.node_mut(id).as_leaf_mut().next = Some(new_id);

        tracing::trace!(left = ?id, right = ?new_id, "leaf split");
        (separator, new_id)
    }

    /// The median key moves up; it is not kept in either half.
    fn split_internal(&mut self, id: NodeId) -> (K, NodeId) {
        let internal = self.node_mut(id).as_internal_mut();

        let mid = internal.keys.len() / 2;
        let keys = internal.keys.split_off(mid + 1);
        let separator = internal
            .keys
            .pop()
            .expect("BUG: overflowing internal node has a median");
        let children = internal.children.split_off(mid + 1);

        let new_id = self.alloc(Node::Internal(InternalNode { keys, children }));

        tracing::trace!(left = ?id, right = ?new_id, "internal split");
        (separator, new_id)
    }

    /// Returns (removed, underflow) for the subtree rooted at `id`.
    fn delete_recursive(&mut self, id: NodeId, key: &K) -> (bool, bool) {
        let min_keys = self.min_keys();

        match self.node_mut(id) {
            Node::Leaf(leaf) => match leaf.keys.binary_search(key) {
                Ok(i) => {
                    leaf.keys.remove(i);
                    leaf.values.remove(i);
                    (true, leaf.keys.len() < min_keys)
                }
                Err(_) => (false, false),
            },

            Node::Internal(internal) => {
                let idx = Self::child_index(&internal.keys, key);
                let child = internal.children[idx];

                let (removed, underflow) = self.delete_recursive(child, key);
                if underflow {
                    self.rebalance_child(id, idx);
                }

                (removed, removed && self.node(id).keys().len() < min_keys)
            }
        }
    }

    fn rebalance_child(&mut self, parent: NodeId, idx: usize) {
        let min_keys = self.min_keys();
        let (left, right) = {
            let p = self.node(parent).as_internal();
            let left = idx.checked_sub(1).map(|i| p.children[i]);
            let right = p.children.get(idx + 1).copied();
            (left, right)
        };

        if left.is_some_and(|l| self.node(l).keys().len() > min_keys) {
            self.borrow_from_left(parent, idx);
            return;
        }

        if right.is_some_and(|r| self.node(r).keys().len() > min_keys) {
            self.borrow_from_right(parent, idx);
            return;
        }

        // Must merge
        if left.is_some() {
            self.merge_children(parent, idx - 1);
        } else {
            self.merge_children(parent, idx);
        }
    }

    fn borrow_from_left(&mut self, parent: NodeId, idx: usize) {
        let sep_idx = idx - 1;
        let (left_id, child_id, sep) = {
            let p = self.node(parent).as_internal();
            (p.children[idx - 1], p.children[idx], p.keys[sep_idx].clone())
        };

        let new_sep = match self.pair_mut(left_id, child_id) {
            (Node::Leaf(left), Node::Leaf(child)) => {
                let key = left.keys.pop().expect("BUG: donor leaf is empty");
                let rids = left.values.pop().expect("BUG: donor leaf is empty");
                child.keys.insert(0, key);
                child.values.insert(0, rids);

                // Separator must be the min key of the RIGHT child
                child.keys[0].clone()
            }

            (Node::Internal(left), Node::Internal(child)) => {
                // Rotate through the parent: separator down, donor's last key up
                child.keys.insert(0, sep);
                let ptr = left.children.pop().expect("BUG: donor node has no children");
                child.children.insert(0, ptr);

                left.keys.pop().expect("BUG: donor node is empty")
            }

            _ => unreachable!("siblings at different depths"),
        };

        self.node_mut(parent).as_internal_mut().keys[sep_idx] = new_sep;
        tracing::trace!(from = ?left_id, to = ?child_id, "borrowed from left sibling");
    }

    fn borrow_from_right(&mut self, parent: NodeId, idx: usize) {
        let sep_idx = idx;
        let (child_id, right_id, sep) = {
            let p = self.node(parent).as_internal();
            (p.children[idx], p.children[idx + 1], p.keys[sep_idx].clone())
        };

        let new_sep = match self.pair_mut(child_id, right_id) {
            (Node::Leaf(child), Node::Leaf(right)) => {
                child.keys.push(right.keys.remove(0));
                child.values.push(right.values.remove(0));

                right.keys[0].clone()
            }

            (Node::Internal(child), Node::Internal(right)) => {
                child.keys.push(sep);
                child.children.push(right.children.remove(0));

                right.keys.remove(0)
            }

            _ => unreachable!("siblings at different depths"),
        };

        self.node_mut(parent).as_internal_mut().keys[sep_idx] = new_sep;
        tracing::trace!(from = ?right_id, to = ?child_id, "borrowed from right sibling");
    }

    /// Folds `children[left_idx + 1]` into `children[left_idx]` and drops
    /// their separator from the parent.
    fn merge_children(&mut self, parent: NodeId, left_idx: usize) {
        let (left_id, right_id, sep) = {
            let p = self.node_mut(parent).as_internal_mut();
            let right_id = p.children.remove(left_idx + 1);
            let sep = p.keys.remove(left_idx);
            (p.children[left_idx], right_id, sep)
        };

        match self.pair_mut(left_id, right_id) {
            (Node::Leaf(left), Node::Leaf(right)) => {
                left.keys.append(&mut right.keys);
                left.values.append(&mut right.values);
                left.next = right.next.take();
            }

            (Node::Internal(left), Node::Internal(right)) => {
                left.keys.push(sep);
                left.keys.append(&mut right.keys);
                left.children.append(&mut right.children);
            }

            _ => unreachable!("siblings at different depths"),
        }

        self.release(right_id);
        tracing::trace!(into = ?left_id, freed = ?right_id, "merged siblings");
    }
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Panics with a description of the first broken structural invariant.
    pub fn check_invariants(&self) {
        assert!(self.order >= 3);

        let height = self.get_height();
        let mut seen = HashSet::new();
        let mut leaves = Vec::new();
        self.check_node(self.root, 0, height, (None, None), &mut seen, &mut leaves);

        assert_eq!(
            seen.len(),
            self.nodes.len() - self.free.len(),
            "arena holds unreachable nodes"
        );

        // The chain must visit exactly the leaves, left to right
        let mut chain = Vec::new();
        let mut next = Some(self.leftmost_leaf());
        while let Some(id) = next {
            chain.push(id);
            next = self.node(id).next_leaf();
        }
        assert_eq!(chain, leaves, "leaf chain diverges from tree order");

        let keys = self.get_all_keys();
        assert!(
            keys.windows(2).all(|w| w[0] < w[1]),
            "leaf chain is not globally sorted"
        );
        assert_eq!(keys.len(), self.len, "distinct key count drifted");
    }

    fn check_node(
        &self,
        id: NodeId,
        depth: usize,
        height: usize,
        (lower, upper): (Option<&K>, Option<&K>),
        seen: &mut HashSet<NodeId>,
        leaves: &mut Vec<NodeId>,
    ) {
        assert!(seen.insert(id), "{id:?} reachable twice");

        let node = self.node(id);
        let keys = node.keys();

        assert!(
            keys.windows(2).all(|w| w[0] < w[1]),
            "keys of {id:?} not strictly increasing"
        );
        assert!(keys.len() <= self.max_keys(), "{id:?} overflows");
        if id != self.root {
            assert!(keys.len() >= self.min_keys(), "{id:?} underflows");
        }
        if let Some(lo) = lower {
            assert!(keys.iter().all(|k| k >= lo), "{id:?} holds keys below its range");
        }
        if let Some(hi) = upper {
            assert!(keys.iter().all(|k| k < hi), "{id:?} holds keys above its range");
        }

        match node {
            Node::Leaf(leaf) => {
                assert_eq!(depth, height, "leaf {id:?} at depth {depth}, expected {height}");
                assert_eq!(leaf.keys.len(), leaf.values.len());
                assert!(leaf.values.iter().all(|rids| !rids.is_empty()));
                leaves.push(id);
            }

            Node::Internal(internal) => {
                assert_eq!(
                    internal.children.len(),
                    internal.keys.len() + 1,
                    "{id:?} child count does not match its keys"
                );

                for (i, &child) in internal.children.iter().enumerate() {
                    let lo = if i == 0 { lower } else { Some(&internal.keys[i - 1]) };
                    let hi = internal.keys.get(i).or(upper);
                    self.check_node(child, depth + 1, height, (lo, hi), seen, leaves);
                }
            }
        }
    }
}

/// In-order iterator over `(key, row ids)` along the leaf chain.
pub struct Iter<'a, K> {
    tree: &'a BPlusTree<K>,
    leaf: Option<NodeId>,
    pos: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = (&'a K, &'a [RowId]);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let tree = self.tree;
            let node = &tree.nodes[self.leaf?.0];
            let leaf = node.as_leaf();

            if self.pos < leaf.keys.len() {
                let i = self.pos;
                self.pos += 1;
                return Some((&leaf.keys[i], leaf.values[i].as_slice()));
            }

            self.leaf = node.next_leaf();
            self.pos = 0;
        }
    }
}
