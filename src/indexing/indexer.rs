//! Project indexer
//!
//! Drives the parser over changed files, keeps the last good tree of each
//! file and merges good trees into the symbol cache. A batch ends with
//! [`ProjectIndexer::finish_batch`], which runs superclass propagation.

use super::{FileTrees, IndexStats};
use crate::cache::SymbolCache;
use crate::config::Settings;
use crate::debug_print;
use crate::error::IndexResult;
use crate::member::MemberTree;
use crate::parsing::MemberParser;
use std::path::Path;
use std::sync::Arc;

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexingOutcome {
    /// The new tree was stored and added to the cache
    Indexed,
    /// The parse failed; the previous good tree stays in use
    KeptPrevious,
    /// The parse failed and there is no earlier tree
    Failed,
}

pub struct ProjectIndexer<P: MemberParser> {
    parser: P,
    cache: SymbolCache,
    trees: FileTrees,
    settings: Arc<Settings>,
    stats: IndexStats,
}

impl<P: MemberParser> ProjectIndexer<P> {
    pub fn new(parser: P) -> Self {
        Self::with_settings(parser, Arc::new(Settings::default()))
    }

    pub fn with_settings(parser: P, settings: Arc<Settings>) -> Self {
        Self {
            parser,
            cache: SymbolCache::with_settings(settings.clone()),
            trees: FileTrees::new(),
            settings,
            stats: IndexStats::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared handle to the cache; clones see every later update
    pub fn cache(&self) -> &SymbolCache {
        &self.cache
    }

    pub fn trees(&self) -> &FileTrees {
        &self.trees
    }

    /// Parses `text` and indexes the resulting tree
    pub fn index_source(&mut self, path: impl AsRef<Path>, text: &str) -> IndexingOutcome {
        let path = path.as_ref();
        let tree = self.parser.parse(text, path);
        self.index_tree(path, tree)
    }

    /// Indexes a tree parsed elsewhere
    pub fn index_tree(&mut self, path: impl AsRef<Path>, tree: MemberTree) -> IndexingOutcome {
        let path = path.as_ref();
        let first_problem = tree.problems().next().map(|problem| problem.display_name());
        let outcome = self.trees.update(path, tree);

        match outcome {
            IndexingOutcome::Indexed => {
                if let Some(tree) = self.trees.usable_tree(path) {
                    if let Some(summary) = self.cache.add_members(&tree, path) {
                        self.stats.members_found += summary.parents + summary.methods;
                    }
                }
                self.stats.files_indexed += 1;
                debug_print!(self, "indexed {}", path.display());
            }
            IndexingOutcome::KeptPrevious | IndexingOutcome::Failed => {
                let error = first_problem.unwrap_or_else(|| "parse failed".to_string());
                debug_print!(self, "parse failed for {}: {}", path.display(), error);
                tracing::debug!(path = %path.display(), ?outcome, "parse failed");
                self.stats.add_error(path.to_path_buf(), error);
            }
        }
        outcome
    }

    /// Closes the batch: runs propagation if anything is indexed and
    /// returns the batch statistics.
    pub fn finish_batch(&mut self) -> IndexResult<IndexStats> {
        if self.cache.is_populated() {
            self.stats.propagation = Some(self.cache.populate_superclass_methods()?);
        }
        self.stats.stop_timing();
        self.stats.report();
        Ok(std::mem::replace(&mut self.stats, IndexStats::new()))
    }

    /// Forgets every file and empties the cache
    pub fn reset(&mut self) {
        self.trees.clear();
        self.cache.reset();
        self.stats = IndexStats::new();
    }
}
