//! Diff data structures for a pull request's changes.
//!
//! Review comments are anchored by *diff position*: the line offset inside a
//! file's patch, counted from the first line after the first `@@` header.
//! Every further hunk header also occupies one position.

/// A complete diff for a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestDiff {
    /// Base commit SHA (the target branch).
    pub base_sha: String,
    /// Head commit SHA (the PR branch).
    pub head_sha: String,
    /// All files changed in this PR.
    pub files: Vec<FileDiff>,
}

impl PullRequestDiff {
    /// Create an empty pull request diff.
    pub fn new(base_sha: impl Into<String>, head_sha: impl Into<String>) -> Self {
        Self {
            base_sha: base_sha.into(),
            head_sha: head_sha.into(),
            files: Vec::new(),
        }
    }

    /// Find a file by its current path.
    pub fn file(&self, path: &str) -> Option<&FileDiff> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Up to `count` diff lines ending at `position` in `path`.
    ///
    /// Used for the context preview shown above a thread's root comment.
    pub fn context_for(&self, path: &str, position: u32, count: usize) -> Vec<&DiffLine> {
        self.file(path)
            .map(|file| file.lines_ending_at(position, count))
            .unwrap_or_default()
    }
}

/// A diff line located by its position within a file's patch.
#[derive(Debug, Clone, Copy)]
pub struct PositionedLine<'a> {
    /// Diff position, 1-based.
    pub position: u32,
    /// The hunk holding the line.
    pub hunk: &'a Hunk,
    /// Index of the line within `hunk.lines`.
    pub index: usize,
}

impl<'a> PositionedLine<'a> {
    pub fn line(&self) -> &'a DiffLine {
        &self.hunk.lines[self.index]
    }
}

/// A single file's diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Current file path (after rename if applicable).
    pub path: String,
    /// Previous file path (if renamed).
    pub old_path: Option<String>,
    /// File status.
    pub status: FileStatus,
    /// Change hunks.
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Create a new file diff.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            old_path: None,
            status: FileStatus::Modified,
            hunks: Vec::new(),
        }
    }

    /// Every commentable line with its diff position.
    ///
    /// Hunk headers after the first consume a position but are not returned.
    pub fn positioned_lines(&self) -> impl Iterator<Item = PositionedLine<'_>> {
        self.hunks
            .iter()
            .scan(0u32, |offset, hunk| {
                let start = *offset;
                // The next hunk's header takes the position after this hunk
                *offset += hunk.lines.len() as u32 + 1;
                Some((start, hunk))
            })
            .flat_map(|(start, hunk)| {
                (0..hunk.lines.len()).map(move |index| PositionedLine {
                    position: start + index as u32 + 1,
                    hunk,
                    index,
                })
            })
    }

    /// Up to `count` lines ending at `position` (inclusive), within the same hunk.
    pub fn lines_ending_at(&self, position: u32, count: usize) -> Vec<&DiffLine> {
        self.positioned_lines()
            .find(|p| p.position == position)
            .map(|p| {
                let end = p.index + 1;
                let start = end.saturating_sub(count);
                p.hunk.lines[start..end].iter().collect()
            })
            .unwrap_or_default()
    }

    /// Number of added lines.
    pub fn additions(&self) -> usize {
        self.count_kind(LineKind::Addition)
    }

    /// Number of deleted lines.
    pub fn deletions(&self) -> usize {
        self.count_kind(LineKind::Deletion)
    }

    fn count_kind(&self, kind: LineKind) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == kind)
            .count()
    }
}

/// File status in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// A hunk (contiguous block of changes) in a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// Starting line in old file.
    pub old_start: u32,
    /// Number of lines in old file.
    pub old_count: u32,
    /// Starting line in new file.
    pub new_start: u32,
    /// Number of lines in new file.
    pub new_count: u32,
    /// Lines in this hunk.
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Create a new hunk.
    pub fn new(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> Self {
        Self {
            old_start,
            old_count,
            new_start,
            new_count,
            lines: Vec::new(),
        }
    }

    /// The `@@ -a,b +c,d @@` header for this hunk.
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }
}

/// A single line in a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    /// Type of line.
    pub kind: LineKind,
    /// Line content (without the +/- prefix).
    pub content: String,
    /// Line number in old file (None for additions).
    pub old_line: Option<u32>,
    /// Line number in new file (None for deletions).
    pub new_line: Option<u32>,
}

impl DiffLine {
    pub fn context(content: impl Into<String>, old_line: u32, new_line: u32) -> Self {
        Self {
            kind: LineKind::Context,
            content: content.into(),
            old_line: Some(old_line),
            new_line: Some(new_line),
        }
    }

    pub fn addition(content: impl Into<String>, new_line: u32) -> Self {
        Self {
            kind: LineKind::Addition,
            content: content.into(),
            old_line: None,
            new_line: Some(new_line),
        }
    }

    pub fn deletion(content: impl Into<String>, old_line: u32) -> Self {
        Self {
            kind: LineKind::Deletion,
            content: content.into(),
            old_line: Some(old_line),
            new_line: None,
        }
    }
}

/// Type of diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unchanged context line.
    Context,
    /// Added line.
    Addition,
    /// Deleted line.
    Deletion,
}

impl LineKind {
    /// Diff prefix character.
    pub fn prefix(&self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
        }
    }
}
