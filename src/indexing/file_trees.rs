//! Last good member tree per file
//!
//! A file being edited fails to parse most of the time. Positional queries
//! keep working against the tree of the last successful parse while the
//! diagnostics of the latest attempt are reported alongside it.

use super::IndexingOutcome;
use crate::member::{MemberTree, Problem};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct FileEntry {
    /// Tree of the last successful parse
    pub good: Option<Arc<MemberTree>>,
    /// Diagnostics of the latest parse, successful or not
    pub problems: Vec<Problem>,
    /// Whether the latest parse failed
    pub latest_failed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FileTrees {
    entries: Arc<DashMap<PathBuf, FileEntry>>,
}

impl FileTrees {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest parse of `path`. A failed tree never replaces a
    /// good one.
    pub fn update(&self, path: impl AsRef<Path>, tree: MemberTree) -> IndexingOutcome {
        let path = path.as_ref();
        let problems: Vec<Problem> = tree.problems().cloned().collect();
        let failed = tree.contains_errors();

        let mut entry = self.entries.entry(path.to_path_buf()).or_default();
        entry.problems = problems;
        entry.latest_failed = failed;

        if !failed {
            entry.good = Some(Arc::new(tree));
            IndexingOutcome::Indexed
        } else if entry.good.is_some() {
            IndexingOutcome::KeptPrevious
        } else {
            IndexingOutcome::Failed
        }
    }

    /// Tree to answer queries with: the latest good parse, if any
    pub fn usable_tree(&self, path: impl AsRef<Path>) -> Option<Arc<MemberTree>> {
        self.entries
            .get(path.as_ref())
            .and_then(|entry| entry.good.clone())
    }

    pub fn problems(&self, path: impl AsRef<Path>) -> Vec<Problem> {
        self.entries
            .get(path.as_ref())
            .map(|entry| entry.problems.clone())
            .unwrap_or_default()
    }

    /// True when the latest parse of `path` failed
    pub fn has_errors(&self, path: impl AsRef<Path>) -> bool {
        self.entries
            .get(path.as_ref())
            .is_some_and(|entry| entry.latest_failed)
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> Option<FileEntry> {
        self.entries.remove(path.as_ref()).map(|(_, entry)| entry)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexed paths, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        paths.sort();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Member;
    use crate::types::Span;

    fn good_tree(path: &str, class: &str) -> MemberTree {
        let mut tree = MemberTree::new(path, 100);
        tree.add_member(Member::class(class, Span::new(0, 6, 50).unwrap()));
        tree
    }

    fn failed_tree(path: &str) -> MemberTree {
        MemberTree::failed(path, [Problem::error("unexpected end-of-input", 3)])
    }

    #[test]
    fn test_failed_parse_keeps_previous_tree() {
        let trees = FileTrees::new();
        assert_eq!(trees.update("a.rb", good_tree("a.rb", "Green")), IndexingOutcome::Indexed);
        assert_eq!(trees.update("a.rb", failed_tree("a.rb")), IndexingOutcome::KeptPrevious);

        let tree = trees.usable_tree("a.rb").unwrap();
        assert!(!tree.contains_errors());
        assert!(trees.has_errors("a.rb"));
        assert_eq!(trees.problems("a.rb")[0].line, 3);
    }

    #[test]
    fn test_failed_first_parse() {
        let trees = FileTrees::new();
        assert_eq!(trees.update("b.rb", failed_tree("b.rb")), IndexingOutcome::Failed);
        assert!(trees.usable_tree("b.rb").is_none());
        assert_eq!(trees.len(), 1);
    }

    #[test]
    fn test_good_parse_replaces_tree_and_clears_problems() {
        let trees = FileTrees::new();
        trees.update("a.rb", good_tree("a.rb", "Green"));
        trees.update("a.rb", failed_tree("a.rb"));
        trees.update("a.rb", good_tree("a.rb", "Blue"));

        let tree = trees.usable_tree("a.rb").unwrap();
        let first = tree.member_list()[0];
        assert_eq!(tree.member(first).unwrap().name(), "Blue");
        assert!(!trees.has_errors("a.rb"));
        assert!(trees.problems("a.rb").is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let trees = FileTrees::new();
        trees.update("a.rb", good_tree("a.rb", "Green"));
        trees.update("b.rb", good_tree("b.rb", "Blue"));
        assert_eq!(trees.paths(), vec![PathBuf::from("a.rb"), PathBuf::from("b.rb")]);

        assert!(trees.remove("a.rb").is_some());
        assert!(trees.usable_tree("a.rb").is_none());
        trees.clear();
        assert!(trees.is_empty());
    }
}
