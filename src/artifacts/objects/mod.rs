//! Object model
//!
//! Every piece of content is stored as an immutable object identified by the
//! SHA-1 hash of its serialized form:
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: directory listing (name-ordered edges with per-edge timestamps)
//! - **Commit**: snapshot with metadata (root tree, parents, author, date, message)
//!
//! All objects share the serialized layout `<type> <size>\0<content>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the shard directory name taken from the front of a hash
pub const SHARD_LENGTH: usize = 3;
