pub mod tree_rebuild;
