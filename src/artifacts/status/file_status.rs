use colored::Colorize;

const LABEL_WIDTH: usize = 8;

/// Classification of a path relative to HEAD and the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileStatus {
    /// Will be picked up by the next commit
    Staged,
    /// Tracked by HEAD but gone from the working tree
    Deleted,
    /// Tracked by HEAD with different content, not staged
    Modified,
    /// Untracked and not staged
    Unstaged,
}

impl FileStatus {
    pub fn short_code(&self) -> &'static str {
        match self {
            FileStatus::Staged => "A ",
            FileStatus::Deleted => " D",
            FileStatus::Modified => " M",
            FileStatus::Unstaged => "??",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Staged => "staged:     ",
            FileStatus::Deleted => "deleted:    ",
            FileStatus::Modified => "modified:   ",
            FileStatus::Unstaged => "untracked:  ",
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let colored_label = match self {
            FileStatus::Staged => self.label().green(),
            FileStatus::Deleted | FileStatus::Modified => self.label().red(),
            FileStatus::Unstaged => self.label().normal(),
        };
        write!(f, "{:>width$}{}", "", colored_label, width = LABEL_WIDTH)
    }
}
