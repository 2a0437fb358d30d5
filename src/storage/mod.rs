pub mod btree;
pub mod index;
