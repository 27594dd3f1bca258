use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use derive_new::new;
use std::collections::{BTreeMap, HashSet};
use tracing::trace;

#[derive(new)]
pub struct RevList<'d> {
    database: &'d Database,
}

impl RevList<'_> {
    /// Every commit reachable from `start`, newest first
    pub fn walk(&self, start: &ObjectId) -> Result<Vec<(ObjectId, Commit)>> {
        let mut visited = HashSet::new();
        let mut history = BTreeMap::new();
        let mut pending = vec![start.clone()];

        while let Some(oid) = pending.pop() {
            if !visited.insert(oid.clone()) {
                continue;
            }

            let commit = self.database.load_commit(&oid)?;
            // push in reverse so the first parent is explored first
            pending.extend(commit.parents().iter().rev().cloned());
            history.insert(commit, oid);
        }

        trace!(commits = history.len(), "walked history");
        Ok(history
            .into_iter()
            .rev()
            .map(|(commit, oid)| (oid, commit))
            .collect())
    }
}
