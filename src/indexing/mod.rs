//! Indexing pipeline
//!
//! Parses files through a [`MemberParser`](crate::parsing::MemberParser),
//! keeps the last good member tree per file and feeds the symbol cache.

pub mod file_trees;
pub mod indexer;
pub mod progress;

pub use file_trees::{FileEntry, FileTrees};
pub use indexer::{IndexingOutcome, ProjectIndexer};
pub use progress::IndexStats;
