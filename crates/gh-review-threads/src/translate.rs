//! The position translator.
//!
//! GitHub anchors review comments to a *diff position*. To offer "jump to
//! line" the panel needs the line in the file as it exists now, which takes
//! up to two lookups:
//!
//! 1. diff position -> line in the head revision (`diff_to_file_position`)
//! 2. head revision line -> working copy line (`file_translations`), only
//!    when the file has local edits and the head revision is checked out.

use crate::model::{CommentTranslations, DiffLine, PullRequestDiff};
use thiserror::Error;

/// Display text for comments whose line is no longer part of the diff.
pub const OUTDATED: &str = "outdated";

/// Result of translating one comment's position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedPosition {
    /// Line to jump to; None disables line-jump controls.
    pub line_number: Option<u32>,
    /// Text shown next to the comment ("", "outdated" or the line number).
    pub display_text: String,
}

impl TranslatedPosition {
    /// No tables were supplied; nothing to show.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn outdated() -> Self {
        Self {
            line_number: None,
            display_text: OUTDATED.to_string(),
        }
    }

    pub fn line(line_number: u32) -> Self {
        Self {
            line_number: Some(line_number),
            display_text: line_number.to_string(),
        }
    }

    pub fn is_outdated(&self) -> bool {
        self.line_number.is_none() && self.display_text == OUTDATED
    }
}

/// Which lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingStage {
    /// Diff position to head revision line.
    Diff,
    /// Head revision line to working copy line.
    LocalEdits,
}

impl std::fmt::Display for MappingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingStage::Diff => write!(f, "diff position"),
            MappingStage::LocalEdits => write!(f, "local edit"),
        }
    }
}

/// The translation tables are inconsistent with the comment being translated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("No translation table for {path}")]
    UnknownPath { path: String },
    #[error("Missing {stage} mapping for {path} at {position}")]
    MissingMapping {
        path: String,
        position: u32,
        stage: MappingStage,
    },
}

/// Translate a comment's diff position into a line in the current file.
///
/// Tables are trusted: a path without a table, or a listed position without
/// a mapping, is reported as an error rather than guessed.
pub fn translate(
    path: &str,
    raw_position: Option<u32>,
    translations: Option<&CommentTranslations>,
    is_checked_out: bool,
) -> Result<TranslatedPosition, TranslationError> {
    let Some(translations) = translations else {
        return Ok(TranslatedPosition::unknown());
    };

    let Some(raw_position) = raw_position else {
        return Ok(TranslatedPosition::outdated());
    };

    let table = translations
        .get(path)
        .ok_or_else(|| TranslationError::UnknownPath {
            path: path.to_string(),
        })?;

    if !table.raw_positions.contains(&raw_position) {
        return Ok(TranslatedPosition::outdated());
    }

    let head_line = *table.diff_to_file_position.get(&raw_position).ok_or_else(|| {
        TranslationError::MissingMapping {
            path: path.to_string(),
            position: raw_position,
            stage: MappingStage::Diff,
        }
    })?;

    let line = match (&table.file_translations, is_checked_out) {
        (Some(local), true) => {
            *local
                .get(&head_line)
                .ok_or_else(|| TranslationError::MissingMapping {
                    path: path.to_string(),
                    position: head_line,
                    stage: MappingStage::LocalEdits,
                })?
        }
        _ => head_line,
    };

    Ok(TranslatedPosition::line(line))
}

/// Up to `lines` diff lines ending at the commented position.
///
/// Empty when the comment is outdated or the file is not in the diff.
pub fn diff_context<'a>(
    diff: &'a PullRequestDiff,
    path: &str,
    raw_position: Option<u32>,
    lines: usize,
) -> Vec<&'a DiffLine> {
    match raw_position {
        Some(position) if lines > 0 => diff.context_for(path, position, lines),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommentTranslationTable;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn tables() -> CommentTranslations {
        CommentTranslations::new().with_table(
            "src/lib.rs",
            CommentTranslationTable::new("digest")
                .with_position(1, 10)
                .with_position(2, 11),
        )
    }

    #[test]
    fn test_no_tables() {
        let result = translate("src/lib.rs", Some(1), None, true).unwrap();
        assert_eq!(result, TranslatedPosition::unknown());
        assert_eq!(result.display_text, "");
    }

    #[test]
    fn test_missing_position_is_outdated() {
        let translations = tables();
        let result = translate("src/lib.rs", None, Some(&translations), true).unwrap();
        assert!(result.is_outdated());

        // Even an unknown path is outdated when there is no position
        let result = translate("nope.rs", None, Some(&translations), false).unwrap();
        assert!(result.is_outdated());
    }

    #[test]
    fn test_position_outside_diff_is_outdated() {
        let translations = tables();
        let result = translate("src/lib.rs", Some(7), Some(&translations), false).unwrap();
        assert_eq!(result, TranslatedPosition::outdated());
    }

    #[test]
    fn test_diff_mapping() {
        let translations = tables();
        let result = translate("src/lib.rs", Some(2), Some(&translations), false).unwrap();
        assert_eq!(result.line_number, Some(11));
        assert_eq!(result.display_text, "11");
    }

    #[test]
    fn test_local_edits_only_when_checked_out() {
        let mut translations = tables();
        translations.get_mut("src/lib.rs").unwrap().file_translations =
            Some(HashMap::from([(10, 14), (11, 15)]));

        let checked_out = translate("src/lib.rs", Some(1), Some(&translations), true).unwrap();
        assert_eq!(checked_out, TranslatedPosition::line(14));

        let elsewhere = translate("src/lib.rs", Some(1), Some(&translations), false).unwrap();
        assert_eq!(elsewhere, TranslatedPosition::line(10));
    }

    #[test]
    fn test_unknown_path_is_an_error() {
        let translations = tables();
        let err = translate("other.rs", Some(1), Some(&translations), false).unwrap_err();
        assert_eq!(
            err,
            TranslationError::UnknownPath {
                path: "other.rs".to_string()
            }
        );
    }

    #[test]
    fn test_missing_mapping_is_an_error() {
        let mut table = CommentTranslationTable::new("digest").with_position(1, 10);
        table.raw_positions.insert(3);
        table.file_translations = Some(HashMap::new());
        let translations = CommentTranslations::new().with_table("a.rs", table);

        let err = translate("a.rs", Some(3), Some(&translations), false).unwrap_err();
        assert!(matches!(
            err,
            TranslationError::MissingMapping {
                stage: MappingStage::Diff,
                position: 3,
                ..
            }
        ));

        let err = translate("a.rs", Some(1), Some(&translations), true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing local edit mapping for a.rs at 10"
        );
    }
}
