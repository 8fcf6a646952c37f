//! Error types for the Ruby symbol index
//!
//! Lookup misses are never errors: they surface as `None` or an empty list.
//! The variants here cover contract violations by the integration layer
//! (querying a failed parse, reading an empty cache) and bad input from the
//! external parser.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for index operations
#[derive(Error, Debug)]
pub enum IndexError {
    /// Member offsets handed over by the parser are inconsistent
    #[error(
        "Invalid member span: start_outer={start_outer}, start={start}, end={end}. Expected start_outer <= start <= end"
    )]
    InvalidSpan {
        start_outer: usize,
        start: usize,
        end: usize,
    },

    /// Positional query on a tree whose parse failed
    #[error(
        "Member tree for '{}' contains parse errors; use the last good tree for this file",
        path.display()
    )]
    TreeHasErrors { path: PathBuf },

    /// A member was moved to a new parent after its member path was computed
    #[error("Member '{name}' cannot be re-parented after its member path was computed")]
    ReparentAfterPath { name: String },

    /// Attaching the child would make a member its own ancestor
    #[error("Member '{name}' cannot become a descendant of itself")]
    CyclicMembership { name: String },

    /// Member id does not belong to the tree it was used with
    #[error("Member id {id} is not part of this member tree")]
    UnknownMember { id: u32 },

    /// Whole-cache operation on a cache that has not seen any file yet
    #[error("Symbol cache is empty. Call add_members() before {operation}")]
    CacheNotPopulated { operation: &'static str },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },
}

impl IndexError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::InvalidSpan { .. } => "INVALID_SPAN",
            Self::TreeHasErrors { .. } => "TREE_HAS_ERRORS",
            Self::ReparentAfterPath { .. } => "REPARENT_AFTER_PATH",
            Self::CyclicMembership { .. } => "CYCLIC_MEMBERSHIP",
            Self::UnknownMember { .. } => "UNKNOWN_MEMBER",
            Self::CacheNotPopulated { .. } => "CACHE_NOT_POPULATED",
            Self::ConfigError { .. } => "CONFIG_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::TreeHasErrors { .. } => vec![
                "Query FileTrees::usable_tree() which keeps the last good parse per file",
                "Check contains_errors() before running positional queries",
            ],
            Self::CacheNotPopulated { .. } => vec![
                "Index at least one file with add_members() first",
                "After reset() the cache is empty until files are indexed again",
            ],
            Self::ReparentAfterPath { .. } => vec![
                "Attach children before calling member_path() on them",
            ],
            Self::InvalidSpan { .. } => vec![
                "Check the offsets produced by the parser for this member",
            ],
            _ => vec![],
        }
    }
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;
