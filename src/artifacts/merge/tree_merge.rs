//! Two-way tree merge
//!
//! Both trees are walked in name order with one cursor each:
//!
//! - a name present on one side only is carried over unchanged
//! - a name that is a directory on both sides is merged recursively
//! - any other clash keeps the edge with the later timestamp; on a tie the
//!   incoming side wins
//!
//! There is no conflict state: the result is always a complete tree.

use crate::areas::database::Database;
use crate::artifacts::objects::tree::{EdgeType, Tree, TreeEdge};
use crate::errors::Result;
use derive_new::new;
use std::cmp::Ordering;
use tracing::trace;

#[derive(new)]
pub struct TreeMerge<'d> {
    database: &'d Database,
}

impl TreeMerge<'_> {
    /// Merge `other` into `base`, storing merged subtrees as they are built
    pub fn merge(&self, base: &Tree, other: &Tree) -> Result<Tree> {
        let mut merged = Tree::default();
        let mut base_edges = base.edges().peekable();
        let mut other_edges = other.edges().peekable();

        loop {
            let edge = match (base_edges.peek().copied(), other_edges.peek().copied()) {
                (Some(base_edge), Some(other_edge)) => {
                    match base_edge.name.cmp(&other_edge.name) {
                        Ordering::Less => base_edges.next().cloned(),
                        Ordering::Greater => other_edges.next().cloned(),
                        Ordering::Equal => {
                            let edge = self.merge_edges(base_edge, other_edge)?;
                            base_edges.next();
                            other_edges.next();
                            Some(edge)
                        }
                    }
                }
                (Some(_), None) => base_edges.next().cloned(),
                (None, Some(_)) => other_edges.next().cloned(),
                (None, None) => break,
            };

            if let Some(edge) = edge {
                merged.insert(edge);
            }
        }

        Ok(merged)
    }

    fn merge_edges(&self, base: &TreeEdge, other: &TreeEdge) -> Result<TreeEdge> {
        if base.is_tree() && other.is_tree() {
            let base_tree = self.database.load_tree(&base.oid)?;
            let other_tree = self.database.load_tree(&other.oid)?;
            let oid = self.database.store(&self.merge(&base_tree, &other_tree)?)?;

            return Ok(if oid == base.oid {
                base.clone()
            } else if oid == other.oid {
                other.clone()
            } else {
                TreeEdge::new(
                    oid,
                    base.name.clone(),
                    EdgeType::Tree,
                    base.created_at.max(other.created_at),
                )
            });
        }

        let winner = if base.created_at > other.created_at {
            base
        } else {
            other
        };
        trace!(name = %winner.name, winner = %winner.oid, "resolved clash by timestamp");

        Ok(winner.clone())
    }
}
