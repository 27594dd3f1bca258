//! Data structures and algorithms
//!
//! - `branch`: branch names and the HEAD pointer
//! - `commit`: rebuilding trees from the working directory
//! - `index`: staged path sets
//! - `log`: commit history traversal
//! - `merge`: two-way tree merge
//! - `objects`: object types (blob, tree, commit)
//! - `status`: working tree status inspection

pub mod branch;
pub mod commit;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
