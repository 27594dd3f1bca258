//! Tree object
//!
//! Trees are directory snapshots. Each edge names a child blob or tree and
//! records when that child's content was last changed. Edges are kept in
//! name order and names are unique within a tree.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<edges>`
//! Each edge: `<kind> <nanos-since-epoch> <name>\0<20-byte-sha1>`
//!
//! The timestamp drives "most recent wins" when two trees are merged.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{MyGitError, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use derive_new::new;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Kind of object an edge points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeType {
    Blob,
    Tree,
}

impl EdgeType {
    pub fn as_str(&self) -> &str {
        match self {
            EdgeType::Blob => "blob",
            EdgeType::Tree => "tree",
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            EdgeType::Blob => ObjectType::Blob,
            EdgeType::Tree => ObjectType::Tree,
        }
    }
}

impl TryFrom<&str> for EdgeType {
    type Error = MyGitError;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(EdgeType::Blob),
            "tree" => Ok(EdgeType::Tree),
            other => Err(MyGitError::corrupt_state(format!(
                "unknown tree edge kind {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEdge {
    pub oid: ObjectId,
    pub name: String,
    pub kind: EdgeType,
    pub created_at: DateTime<Utc>,
}

impl TreeEdge {
    pub fn is_tree(&self) -> bool {
        self.kind == EdgeType::Tree
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    edges: BTreeMap<String, TreeEdge>,
}

impl Tree {
    pub fn from_edges(edges: impl IntoIterator<Item = TreeEdge>) -> Self {
        Self {
            edges: edges
                .into_iter()
                .map(|edge| (edge.name.clone(), edge))
                .collect(),
        }
    }

    /// Insert an edge, replacing any edge with the same name
    pub fn insert(&mut self, edge: TreeEdge) -> Option<TreeEdge> {
        self.edges.insert(edge.name.clone(), edge)
    }

    pub fn get(&self, name: &str) -> Option<&TreeEdge> {
        self.edges.get(name)
    }

    /// Edges in name order
    pub fn edges(&self) -> impl Iterator<Item = &TreeEdge> {
        self.edges.values()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();

        for edge in self.edges.values() {
            let nanos = edge.created_at.timestamp_nanos_opt().ok_or_else(|| {
                MyGitError::invalid_argument(format!(
                    "timestamp of {} cannot be stored: {}",
                    edge.name, edge.created_at
                ))
            })?;

            write!(content, "{} {} {}", edge.kind.as_str(), nanos, edge.name)
                .and_then(|_| content.write_all(&[0]))
                .map_err(|e| MyGitError::corrupt_state(format!("unable to encode tree: {e}")))?;
            edge.oid.write_h40_to(&mut content)?;
        }

        Ok(frame(self.object_type(), &content))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut tree = Tree::default();

        // Reuse scratch buffers across edges
        let mut field = Vec::new();
        loop {
            let Some(kind) = read_field(&mut reader, b' ', &mut field)? else {
                break; // clean EOF: no more edges
            };
            let kind = EdgeType::try_from(kind.as_str())?;

            let nanos = read_field(&mut reader, b' ', &mut field)?
                .and_then(|nanos| nanos.parse::<i64>().ok())
                .ok_or_else(|| MyGitError::corrupt_state("tree edge has no timestamp"))?;

            let name = read_field(&mut reader, b'\0', &mut field)?
                .filter(|name| !name.is_empty())
                .ok_or_else(|| MyGitError::corrupt_state("tree edge has no name"))?;

            let oid = ObjectId::read_h40_from(&mut reader)?;

            tree.insert(TreeEdge::new(
                oid,
                name,
                kind,
                DateTime::from_timestamp_nanos(nanos),
            ));
        }

        Ok(tree)
    }
}

/// Read up to `delimiter`; `None` at a clean end of input
fn read_field(
    reader: &mut impl BufRead,
    delimiter: u8,
    buffer: &mut Vec<u8>,
) -> Result<Option<String>> {
    buffer.clear();
    let read = reader
        .read_until(delimiter, buffer)
        .map_err(|e| MyGitError::corrupt_state(format!("unreadable tree: {e}")))?;
    if read == 0 {
        return Ok(None);
    }
    if buffer.pop() != Some(delimiter) {
        return Err(MyGitError::corrupt_state("unexpected end of tree data"));
    }

    String::from_utf8(buffer.clone())
        .map(Some)
        .map_err(|_| MyGitError::corrupt_state("tree edge is not valid UTF-8"))
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
