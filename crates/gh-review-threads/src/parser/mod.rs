//! Diff parsing.

mod unified;

pub use unified::{parse_unified_diff, ParseError};
