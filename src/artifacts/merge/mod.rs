pub mod tree_merge;
