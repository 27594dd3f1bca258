//! Object database
//!
//! Objects are stored zlib-compressed under `objects/<3-hex>/<37-hex>`.
//! Writes go through a temporary file that is renamed into place, and an
//! object that already exists is never rewritten.
//!
//! Content-addressed objects never change once written, so parsed trees and
//! object kinds are memoized for the lifetime of the database handle.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::objects::{OBJECT_ID_LENGTH, SHARD_LENGTH};
use crate::errors::{IoResultExt, MyGitError, Result};
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
    trees: RefCell<HashMap<ObjectId, Tree>>,
    object_types: RefCell<HashMap<ObjectId, ObjectType>>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database {
            path,
            trees: RefCell::new(HashMap::new()),
            object_types: RefCell::new(HashMap::new()),
        }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Persist an object and return its ID
    ///
    /// Storing the same content twice leaves a single file on disk.
    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        let object_content = object.serialize()?;
        let object_id = ObjectId::hash_content(&object_content);
        let object_path = self.object_path(&object_id)?;

        if object_path.exists() {
            trace!(oid = %object_id, "object already stored");
        } else {
            let object_dir = object_path.parent().ok_or_else(|| {
                MyGitError::corrupt_state(format!("invalid object path {}", object_path.display()))
            })?;
            std::fs::create_dir_all(object_dir).with_io_context(|| {
                format!("Unable to create object directory {}", object_dir.display())
            })?;

            self.write_object(&object_path, object_content)?;
            debug!(oid = %object_id, kind = %object.object_type(), "stored object");
        }

        self.object_types
            .borrow_mut()
            .insert(object_id.clone(), object.object_type());

        Ok(object_id)
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> Result<Blob> {
        match self.parse_object(object_id)? {
            ObjectBox::Blob(blob) => Ok(*blob),
            other => Err(Self::wrong_type(object_id, ObjectType::Blob, other.object_type())),
        }
    }

    pub fn load_tree(&self, object_id: &ObjectId) -> Result<Tree> {
        if let Some(tree) = self.trees.borrow().get(object_id) {
            return Ok(tree.clone());
        }

        match self.parse_object(object_id)? {
            ObjectBox::Tree(tree) => {
                self.trees
                    .borrow_mut()
                    .insert(object_id.clone(), (*tree).clone());
                Ok(*tree)
            }
            other => Err(Self::wrong_type(object_id, ObjectType::Tree, other.object_type())),
        }
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> Result<Commit> {
        match self.parse_object(object_id)? {
            ObjectBox::Commit(commit) => Ok(*commit),
            other => Err(Self::wrong_type(
                object_id,
                ObjectType::Commit,
                other.object_type(),
            )),
        }
    }

    /// Kind of a stored object, decoding only its header
    pub fn object_type(&self, object_id: &ObjectId) -> Result<ObjectType> {
        if let Some(object_type) = self.object_types.borrow().get(object_id) {
            return Ok(*object_type);
        }

        let object_path = self.object_path(object_id)?;
        let file = std::fs::File::open(&object_path)
            .map_err(|_| MyGitError::corrupt_state(format!("object {object_id} not found")))?;
        let mut reader = BufReader::new(flate2::read::ZlibDecoder::new(file));
        let (object_type, _) = ObjectType::parse_header(&mut reader)?;

        self.object_types
            .borrow_mut()
            .insert(object_id.clone(), object_type);

        Ok(object_type)
    }

    /// Every object ID present in the store
    pub fn list_object_ids(&self) -> Result<Vec<ObjectId>> {
        let mut object_ids = Vec::new();

        for entry in WalkDir::new(&self.path).min_depth(2).max_depth(2) {
            let entry = entry.map_err(|e| {
                MyGitError::corrupt_state(format!("unable to list objects: {e}"))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let shard = entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            let file = entry.file_name().to_string_lossy();

            // skips leftovers of interrupted writes
            if shard.len() == SHARD_LENGTH
                && shard.len() + file.len() == OBJECT_ID_LENGTH
                && let Ok(oid) = ObjectId::try_parse(format!("{shard}{file}"))
            {
                object_ids.push(oid);
            }
        }

        object_ids.sort();
        Ok(object_ids)
    }

    pub fn list_commit_ids(&self) -> Result<Vec<ObjectId>> {
        let mut commit_ids = Vec::new();
        for object_id in self.list_object_ids()? {
            if self.object_type(&object_id)? == ObjectType::Commit {
                commit_ids.push(object_id);
            }
        }

        Ok(commit_ids)
    }

    /// Find all objects whose ID starts with the given prefix
    pub fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }
        let prefix = prefix.to_ascii_lowercase();

        if prefix.len() < SHARD_LENGTH {
            return Ok(self
                .list_object_ids()?
                .into_iter()
                .filter(|oid| oid.as_ref().starts_with(&prefix))
                .collect());
        }

        // only one shard directory can hold matches
        let (dir_name, file_prefix) = prefix.split_at(SHARD_LENGTH);
        let dir_path = self.path.join(dir_name);
        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        let entries = std::fs::read_dir(&dir_path)
            .with_io_context(|| format!("Unable to list objects in {}", dir_path.display()))?;
        for entry in entries {
            let entry = entry
                .with_io_context(|| format!("Unable to list objects in {}", dir_path.display()))?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix)
                && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
            {
                matches.push(oid);
            }
        }

        matches.sort();
        Ok(matches)
    }

    fn object_path(&self, object_id: &ObjectId) -> Result<PathBuf> {
        let (dir, file) = ObjectId::split(object_id.as_ref())?;
        Ok(self.path.join(dir).join(file))
    }

    fn parse_object_as_bytes(&self, object_id: &ObjectId) -> Result<(ObjectType, impl BufRead)> {
        let object_content = self.read_object(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let (object_type, size) = ObjectType::parse_header(&mut object_reader)?;
        let body_len = object_reader.get_ref().len() - object_reader.position() as usize;
        if body_len != size {
            return Err(MyGitError::corrupt_state(format!(
                "object {object_id} declares {size} bytes but holds {body_len}"
            )));
        }

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_id: &ObjectId) -> Result<Bytes> {
        let object_path = self.object_path(object_id)?;
        if !object_path.is_file() {
            return Err(MyGitError::corrupt_state(format!(
                "object {object_id} not found"
            )));
        }

        let object_content = std::fs::read(&object_path).with_io_context(|| {
            format!("Unable to read object file {}", object_path.display())
        })?;

        Self::decompress(object_content.into())
            .map_err(|e| MyGitError::corrupt_state(format!("object {object_id}: {e}")))
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> Result<()> {
        let object_dir = object_path.parent().ok_or_else(|| {
            MyGitError::corrupt_state(format!("invalid object path {}", object_path.display()))
        })?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content).with_io_context(|| {
            format!("Unable to compress object {}", object_path.display())
        })?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .with_io_context(|| {
                format!("Unable to open object file {}", temp_object_path.display())
            })?;

        file.write_all(&object_content).with_io_context(|| {
            format!("Unable to write object file {}", temp_object_path.display())
        })?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, object_path).with_io_context(|| {
            format!("Unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: Bytes) -> std::io::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&data)?;

        encoder.finish().map(Bytes::from)
    }

    fn decompress(data: Bytes) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    fn wrong_type(object_id: &ObjectId, expected: ObjectType, actual: ObjectType) -> MyGitError {
        MyGitError::corrupt_state(format!(
            "object {object_id} is a {actual}, expected a {expected}"
        ))
    }
}
