pub mod branch_name;
pub mod head_status;
pub mod revision;

/// Names rejected for branches: hidden or relative names, path separators,
/// lock-file suffixes, reflog syntax, whitespace, control and glob characters
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|/|\.\.|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

pub const DEFAULT_BRANCH: &str = "master";
