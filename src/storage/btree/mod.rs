pub mod b_plus_tree;
pub mod node;


pub use b_plus_tree::{BPlusTree, Iter};
pub use node::{InternalNode, LeafNode, Node, NodeId};
