//! Precomputed per-file tables that translate diff positions into file lines.

use super::diff::{FileDiff, PositionedLine, PullRequestDiff};
use sha2::{Digest, Sha256};
use similar::{DiffOp, TextDiff};
use std::collections::{BTreeSet, HashMap};

/// SHA-256 fingerprint of file contents, hex encoded.
pub fn content_digest(contents: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Translation table for a single file.
///
/// `diff_to_file_position` is only consulted for positions listed in
/// `raw_positions`; a position missing from `raw_positions` is outdated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentTranslationTable {
    /// Diff positions that exist in the fetched diff.
    pub raw_positions: BTreeSet<u32>,
    /// Diff position -> line in the head revision of the file.
    pub diff_to_file_position: HashMap<u32, u32>,
    /// Head revision line -> line in the working copy. Only set when the file has local edits.
    pub file_translations: Option<HashMap<u32, u32>>,
    /// Fingerprint of the contents the table was computed from.
    pub digest: String,
}

impl CommentTranslationTable {
    /// Create an empty table for contents with the given digest.
    pub fn new(digest: impl Into<String>) -> Self {
        Self {
            digest: digest.into(),
            ..Self::default()
        }
    }

    /// Record that `raw_position` maps to `line` in the head revision.
    pub fn insert(&mut self, raw_position: u32, line: u32) {
        self.raw_positions.insert(raw_position);
        self.diff_to_file_position.insert(raw_position, line);
    }

    /// Builder variant of [`insert`](Self::insert).
    pub fn with_position(mut self, raw_position: u32, line: u32) -> Self {
        self.insert(raw_position, line);
        self
    }

    /// Compute the table for one file of a parsed diff.
    ///
    /// Deleted lines have no line in the head revision; they map to the next
    /// surviving line of their hunk (or the previous one at the hunk's end).
    /// The digest covers `head_contents` when known, otherwise the patch itself.
    pub fn from_file_diff(file: &FileDiff, head_contents: Option<&str>) -> Self {
        let digest = match head_contents {
            Some(contents) => content_digest(contents),
            None => content_digest(&patch_text(file)),
        };
        let mut table = Self::new(digest);

        for PositionedLine {
            position,
            hunk,
            index,
        } in file.positioned_lines()
        {
            let target = hunk.lines[index..]
                .iter()
                .find_map(|l| l.new_line)
                .or_else(|| hunk.lines[..index].iter().rev().find_map(|l| l.new_line))
                .unwrap_or(hunk.new_start.max(1));
            table.insert(position, target);
        }

        table
    }

    /// Compute the local-edit table from the head revision to the working copy.
    ///
    /// Unchanged lines map exactly; removed or replaced lines map to the first
    /// line of whatever took their place. Identical contents clear the table.
    pub fn apply_local_edits(&mut self, head: &str, working: &str) {
        if head == working {
            self.file_translations = None;
            return;
        }

        let working_lines = working.lines().count().max(1) as u32;
        let mut map = HashMap::new();
        let diff = TextDiff::from_lines(head, working);

        for op in diff.ops() {
            match *op {
                DiffOp::Equal {
                    old_index,
                    new_index,
                    len,
                } => {
                    for i in 0..len {
                        map.insert((old_index + i + 1) as u32, (new_index + i + 1) as u32);
                    }
                }
                DiffOp::Delete {
                    old_index,
                    old_len,
                    new_index,
                }
                | DiffOp::Replace {
                    old_index,
                    old_len,
                    new_index,
                    ..
                } => {
                    let target = ((new_index + 1) as u32).min(working_lines);
                    for i in 0..old_len {
                        map.insert((old_index + i + 1) as u32, target);
                    }
                }
                DiffOp::Insert { .. } => {}
            }
        }

        self.file_translations = Some(map);
    }

    /// Whether a local-edit table is present.
    pub fn has_local_edits(&self) -> bool {
        self.file_translations.is_some()
    }
}

/// Reconstruct a file's patch text (used for digests when contents are unknown).
fn patch_text(file: &FileDiff) -> String {
    let mut text = String::new();
    for hunk in &file.hunks {
        text.push_str(&hunk.header());
        text.push('\n');
        for line in &hunk.lines {
            text.push(line.kind.prefix());
            text.push_str(&line.content);
            text.push('\n');
        }
    }
    text
}

/// Translation tables for every file of a pull request, keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentTranslations {
    tables: HashMap<String, CommentTranslationTable>,
}

impl CommentTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build tables for every file in `diff`.
    ///
    /// `head_contents` supplies a file's head revision contents when available;
    /// they only affect the digest.
    pub fn from_diff<F>(diff: &PullRequestDiff, mut head_contents: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut translations = Self::new();
        for file in &diff.files {
            let contents = head_contents(&file.path);
            let table = CommentTranslationTable::from_file_diff(file, contents.as_deref());
            translations.insert(file.path.clone(), table);
        }
        log::debug!("Built translation tables for {} files", translations.len());
        translations
    }

    pub fn insert(&mut self, path: impl Into<String>, table: CommentTranslationTable) {
        self.tables.insert(path.into(), table);
    }

    /// Builder variant of [`insert`](Self::insert).
    pub fn with_table(mut self, path: impl Into<String>, table: CommentTranslationTable) -> Self {
        self.insert(path, table);
        self
    }

    pub fn get(&self, path: &str) -> Option<&CommentTranslationTable> {
        self.tables.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut CommentTranslationTable> {
        self.tables.get_mut(path)
    }

    /// Whether the stored digest for `path` no longer matches `contents`.
    ///
    /// Unknown paths are never stale; there is nothing to invalidate.
    pub fn is_stale(&self, path: &str, contents: &str) -> bool {
        self.tables
            .get(path)
            .is_some_and(|table| table.digest != content_digest(contents))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiffLine, Hunk};
    use pretty_assertions::assert_eq;

    fn file_with_deletion() -> FileDiff {
        // @@ -10,4 +10,4 @@
        //  ten            pos 1 -> 10
        // -eleven         pos 2 -> 11 (next surviving line)
        // +eleven!        pos 3 -> 11
        //  twelve         pos 4 -> 12
        // @@ -40,2 +40,1 @@  (pos 5)
        //  forty          pos 6 -> 40
        // -forty-one      pos 7 -> 40 (no following line, previous one)
        let mut file = FileDiff::new("src/lib.rs");

        let mut first = Hunk::new(10, 3, 10, 3);
        first.lines.push(DiffLine::context("ten", 10, 10));
        first.lines.push(DiffLine::deletion("eleven", 11));
        first.lines.push(DiffLine::addition("eleven!", 11));
        first.lines.push(DiffLine::context("twelve", 12, 12));
        file.hunks.push(first);

        let mut second = Hunk::new(40, 2, 40, 1);
        second.lines.push(DiffLine::context("forty", 40, 40));
        second.lines.push(DiffLine::deletion("forty-one", 41));
        file.hunks.push(second);

        file
    }

    #[test]
    fn test_from_file_diff_positions() {
        let table = CommentTranslationTable::from_file_diff(&file_with_deletion(), None);

        assert_eq!(
            table.raw_positions.iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 6, 7]
        );
        assert_eq!(table.diff_to_file_position[&1], 10);
        assert_eq!(table.diff_to_file_position[&2], 11);
        assert_eq!(table.diff_to_file_position[&3], 11);
        assert_eq!(table.diff_to_file_position[&4], 12);
        assert_eq!(table.diff_to_file_position[&6], 40);
        assert_eq!(table.diff_to_file_position[&7], 40);
        assert!(!table.diff_to_file_position.contains_key(&5));
        assert!(table.file_translations.is_none());
    }

    #[test]
    fn test_digest_prefers_head_contents() {
        let file = file_with_deletion();
        let with_contents = CommentTranslationTable::from_file_diff(&file, Some("contents"));
        let without = CommentTranslationTable::from_file_diff(&file, None);

        assert_eq!(with_contents.digest, content_digest("contents"));
        assert_ne!(with_contents.digest, without.digest);
        assert_eq!(with_contents.digest.len(), 64);
    }

    #[test]
    fn test_local_edits_shift_lines() {
        let head = "one\ntwo\nthree\nfour\n";
        let working = "zero\none\ntwo\nthree\nfour\n";

        let mut table = CommentTranslationTable::new(content_digest(head));
        table.apply_local_edits(head, working);

        let map = table.file_translations.as_ref().unwrap();
        assert_eq!(map[&1], 2);
        assert_eq!(map[&4], 5);
    }

    #[test]
    fn test_local_edits_removed_line_maps_to_replacement() {
        let head = "one\ntwo\nthree\n";
        let working = "one\nthree\n";

        let mut table = CommentTranslationTable::default();
        table.apply_local_edits(head, working);

        let map = table.file_translations.as_ref().unwrap();
        assert_eq!(map[&1], 1);
        assert_eq!(map[&2], 2);
        assert_eq!(map[&3], 2);
    }

    #[test]
    fn test_identical_contents_clear_local_edits() {
        let mut table = CommentTranslationTable::default();
        table.apply_local_edits("a\n", "b\n");
        assert!(table.has_local_edits());

        table.apply_local_edits("a\n", "a\n");
        assert!(!table.has_local_edits());
    }

    #[test]
    fn test_is_stale() {
        let translations = CommentTranslations::new()
            .with_table("a.rs", CommentTranslationTable::new(content_digest("v1")));

        assert!(!translations.is_stale("a.rs", "v1"));
        assert!(translations.is_stale("a.rs", "v2"));
        assert!(!translations.is_stale("unknown.rs", "v2"));
    }

    #[test]
    fn test_from_diff_covers_every_file() {
        let mut diff = PullRequestDiff::new("base", "head");
        diff.files.push(file_with_deletion());
        diff.files.push(FileDiff::new("README.md"));

        let translations =
            CommentTranslations::from_diff(&diff, |path| (path == "README.md").then(String::new));

        assert_eq!(translations.len(), 2);
        assert_eq!(
            translations.get("README.md").map(|t| t.digest.clone()),
            Some(content_digest(""))
        );
    }
}
