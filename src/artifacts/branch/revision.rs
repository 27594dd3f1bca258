use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head_status::HeadStatus;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{MyGitError, Result};
use tracing::trace;

/// A checkout target: a branch name or a commit hash
///
/// Resolution order:
/// - an existing branch with that name
/// - a full 40-character commit hash
/// - an abbreviated hash of at least 4 characters matching exactly one commit
///
/// Branches win over hashes when a branch happens to be named like one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Branch(BranchName),
    Commit(ObjectId),
}

impl Revision {
    pub fn resolve(revision: &str, refs: &Refs, database: &Database) -> Result<Revision> {
        if let Ok(branch) = BranchName::try_parse(revision.to_string())
            && refs.read_branch(&branch)?.is_some()
        {
            return Ok(Revision::Branch(branch));
        }

        if !ObjectId::is_valid_prefix(revision)
            || !revision.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(Self::unknown(revision));
        }

        if revision.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(revision.to_string())?;
            return if Self::is_commit(&oid, database)? {
                Ok(Revision::Commit(oid))
            } else {
                Err(Self::unknown(revision))
            };
        }

        let mut candidates = Vec::new();
        for oid in database.find_objects_by_prefix(revision)? {
            if Self::is_commit(&oid, database)? {
                candidates.push(oid);
            }
        }
        trace!(revision, candidates = candidates.len(), "resolved abbreviated hash");

        match candidates.as_slice() {
            [] => Err(Self::unknown(revision)),
            [oid] => Ok(Revision::Commit(oid.clone())),
            _ => {
                let hints = candidates
                    .iter()
                    .map(ObjectId::to_short_oid)
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(MyGitError::invalid_argument(format!(
                    "short hash {revision} is ambiguous; candidates are: {hints}"
                )))
            }
        }
    }

    /// HEAD content after checking out this revision
    pub fn into_head(self) -> HeadStatus {
        match self {
            Revision::Branch(branch) => HeadStatus::Attached(branch),
            Revision::Commit(oid) => HeadStatus::Detached(oid),
        }
    }

    fn is_commit(oid: &ObjectId, database: &Database) -> Result<bool> {
        Ok(database.contains(oid) && database.object_type(oid)? == ObjectType::Commit)
    }

    fn unknown(revision: &str) -> MyGitError {
        MyGitError::invalid_argument(format!(
            "revision '{revision}' is neither a branch nor a commit"
        ))
    }
}
