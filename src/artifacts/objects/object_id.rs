//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character lowercase hexadecimal strings. They identify
//! every blob, tree and commit in the store.
//!
//! ## Storage
//!
//! Objects live under `.mygit/objects/<first-3-chars>/<remaining-37-chars>`,
//! so an ID is split into a shard directory and a file name.

use crate::artifacts::objects::{OBJECT_ID_LENGTH, SHARD_LENGTH};
use crate::errors::{MyGitError, Result};
use sha1::{Digest, Sha1};
use std::io;

/// Shortest prefix accepted when resolving an abbreviated commit ID.
pub const MIN_PREFIX_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID
    ///
    /// Accepts 40 hexadecimal characters in either case and stores them
    /// lowercased.
    pub fn try_parse(id: String) -> Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(MyGitError::invalid_argument(format!(
                "object ID must be {OBJECT_ID_LENGTH} characters long, got {} ({id:?})",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MyGitError::invalid_argument(format!(
                "object ID contains non-hexadecimal characters: {id}"
            )));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Digest of already serialized object bytes
    pub fn hash_content(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Split a hash into its shard directory and file name parts
    ///
    /// Fails with `InvalidArgument` unless the input is exactly 40 characters.
    pub fn split(hash: &str) -> Result<(&str, &str)> {
        if hash.len() != OBJECT_ID_LENGTH || !hash.is_ascii() {
            return Err(MyGitError::invalid_argument(format!(
                "cannot split {hash:?}: expected {OBJECT_ID_LENGTH} characters"
            )));
        }
        Ok(hash.split_at(SHARD_LENGTH))
    }

    /// Write the object ID in binary form (20 bytes)
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let hex40 = self.as_ref();

        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&hex40[i..i + 2], 16).map_err(|_| {
                MyGitError::corrupt_state(format!("invalid hex digit in object ID {hex40}"))
            })?;
            writer.write_all(&[byte]).map_err(|e| {
                MyGitError::corrupt_state(format!("unable to write object ID {hex40}: {e}"))
            })?;
        }

        Ok(())
    }

    /// Read an object ID from binary form (20 bytes)
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0; OBJECT_ID_LENGTH / 2];
        reader
            .read_exact(&mut buffer)
            .map_err(|_| MyGitError::corrupt_state("unexpected end of data in object ID"))?;

        let hex40 = buffer
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>();

        Ok(Self(hex40))
    }

    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }

    /// Whether `prefix` could abbreviate an object ID
    pub fn is_valid_prefix(prefix: &str) -> bool {
        (MIN_PREFIX_LENGTH..=OBJECT_ID_LENGTH).contains(&prefix.len())
            && prefix.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
