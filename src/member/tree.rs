//! Per-file member tree and positional queries
//!
//! The tree owns every member the parser produced for one file in an arena.
//! Queries run over a flattened pre-order list whose order follows the
//! source, so it is sorted by start offset without any explicit sort.

use super::{Member, MemberKind, MemberVisitor, Problem};
use crate::error::{IndexError, IndexResult};
use crate::types::MemberId;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Structural identity of a member.
///
/// Two members are the same entity when their full names, their method
/// staticness and the full names of all enclosing members match. This holds
/// across files: a class reopened in another file has the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberKey {
    pub full_name: String,
    /// `Some(is_class_method)` for methods
    pub class_method: Option<bool>,
    /// Full names of the enclosing members, outermost first
    pub ancestry: Vec<String>,
}

#[derive(Debug, Clone)]
struct Node {
    member: Member,
    parent: Option<MemberId>,
    children: Vec<MemberId>,
    path: OnceLock<Vec<MemberId>>,
}

impl Node {
    fn new(member: Member) -> Self {
        Self {
            member,
            parent: None,
            children: Vec::new(),
            path: OnceLock::new(),
        }
    }
}

/// Members and diagnostics parsed from one file
#[derive(Debug, Clone)]
pub struct MemberTree {
    path: PathBuf,
    nodes: Vec<Node>,
    root: MemberId,
    top_level: Vec<MemberId>,
    problems: Vec<MemberId>,
    failed: bool,
    /// Pre-order list of all members below the root; reset on every structural change
    member_list: OnceLock<Vec<MemberId>>,
}

impl MemberTree {
    /// Empty tree for a successfully parsed file of `text_len` characters
    pub fn new(path: impl AsRef<Path>, text_len: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            nodes: vec![Node::new(Member::root(text_len))],
            root: MemberId::from_index(0),
            top_level: Vec::new(),
            problems: Vec::new(),
            failed: false,
            member_list: OnceLock::new(),
        }
    }

    /// Tree for a file the parser could not read. Only diagnostics are available.
    pub fn failed(path: impl AsRef<Path>, problems: impl IntoIterator<Item = Problem>) -> Self {
        let mut tree = Self::new(path, 0);
        tree.failed = true;
        for problem in problems {
            tree.add_problem(problem);
        }
        tree
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains_errors(&self) -> bool {
        self.failed
    }

    /// Adds a top-level member. Use [`MemberTree::add_child`] to nest it.
    pub fn add_member(&mut self, member: Member) -> MemberId {
        let is_problem = matches!(member.kind(), MemberKind::Problem(_));
        let id = MemberId::from_index(self.nodes.len());
        self.nodes.push(Node::new(member));

        if is_problem {
            self.problems.push(id);
        } else {
            self.top_level.push(id);
        }
        self.member_list = OnceLock::new();
        id
    }

    pub fn add_problem(&mut self, problem: Problem) -> MemberId {
        self.add_member(Member::problem(problem))
    }

    /// Appends `child` to `parent`, replacing any previous parent link.
    ///
    /// Moving a member is only allowed while neither it nor any of its
    /// descendants had its member path computed; otherwise the memoized paths
    /// would go stale and `IndexError::ReparentAfterPath` is returned.
    /// Using the root as `parent` moves the child back to the top level.
    pub fn add_child(&mut self, parent: MemberId, child: MemberId) -> IndexResult<()> {
        self.node(parent)?;
        self.node(child)?;

        let new_parent = (parent != self.root).then_some(parent);
        if self.nodes[child.index()].parent == new_parent && self.top_level_or_child(child) {
            return Ok(());
        }

        if let Some(new_parent) = new_parent {
            if new_parent == child || self.is_ancestor(child, new_parent) {
                return Err(IndexError::CyclicMembership {
                    name: self.nodes[child.index()].member.full_name(),
                });
            }
        }

        if self.subtree_has_path(child) {
            return Err(IndexError::ReparentAfterPath {
                name: self.nodes[child.index()].member.full_name(),
            });
        }

        match self.nodes[child.index()].parent {
            Some(old_parent) => self.nodes[old_parent.index()]
                .children
                .retain(|id| *id != child),
            None => self.top_level.retain(|id| *id != child),
        }

        self.nodes[child.index()].parent = new_parent;
        match new_parent {
            Some(new_parent) => self.nodes[new_parent.index()].children.push(child),
            None => self.top_level.push(child),
        }

        self.member_list = OnceLock::new();
        Ok(())
    }

    fn top_level_or_child(&self, id: MemberId) -> bool {
        match self.nodes[id.index()].parent {
            Some(parent) => self.nodes[parent.index()].children.contains(&id),
            None => self.top_level.contains(&id),
        }
    }

    fn is_ancestor(&self, candidate: MemberId, mut id: MemberId) -> bool {
        while let Some(parent) = self.nodes[id.index()].parent {
            if parent == candidate {
                return true;
            }
            id = parent;
        }
        false
    }

    fn subtree_has_path(&self, id: MemberId) -> bool {
        let node = &self.nodes[id.index()];
        node.path.get().is_some()
            || node
                .children
                .iter()
                .any(|child| self.subtree_has_path(*child))
    }

    fn node(&self, id: MemberId) -> IndexResult<&Node> {
        if id.value() == 0 {
            return Err(IndexError::UnknownMember { id: 0 });
        }
        self.nodes
            .get(id.index())
            .ok_or(IndexError::UnknownMember { id: id.value() })
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.node(id).ok().map(|node| &node.member)
    }

    /// Mutable access for documentation updates.
    pub fn member_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        if id.value() == 0 {
            return None;
        }
        self.nodes.get_mut(id.index()).map(|node| &mut node.member)
    }

    /// Parent link; `None` for top-level members and the root
    pub fn parent(&self, id: MemberId) -> Option<MemberId> {
        self.node(id).ok().and_then(|node| node.parent)
    }

    pub fn children(&self, id: MemberId) -> &[MemberId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Synthetic member spanning the whole file
    pub fn root(&self) -> MemberId {
        self.root
    }

    fn ensure_parsed(&self) -> IndexResult<()> {
        if self.failed {
            Err(IndexError::TreeHasErrors {
                path: self.path.clone(),
            })
        } else {
            Ok(())
        }
    }

    /// Top-level members in source order
    pub fn members(&self) -> IndexResult<&[MemberId]> {
        self.ensure_parsed()?;
        Ok(&self.top_level)
    }

    pub fn size(&self) -> IndexResult<usize> {
        Ok(self.members()?.len())
    }

    pub fn get(&self, index: usize) -> IndexResult<Option<MemberId>> {
        Ok(self.members()?.get(index).copied())
    }

    pub fn problems(&self) -> impl Iterator<Item = &Problem> + '_ {
        self.problems
            .iter()
            .filter_map(|id| match self.nodes[id.index()].member.kind() {
                MemberKind::Problem(problem) => Some(problem),
                _ => None,
            })
    }

    /// All members below the root in pre-order. Empty for a failed parse.
    pub fn member_list(&self) -> &[MemberId] {
        self.member_list.get_or_init(|| {
            let mut list = Vec::with_capacity(self.nodes.len());
            if !self.failed {
                for id in &self.top_level {
                    self.flatten_into(*id, &mut list);
                }
            }
            list
        })
    }

    fn flatten_into(&self, id: MemberId, list: &mut Vec<MemberId>) {
        list.push(id);
        for child in &self.nodes[id.index()].children {
            self.flatten_into(*child, list);
        }
    }

    /// Chain from the outermost ancestor down to the member itself.
    ///
    /// Memoized on first call; the member can no longer be moved afterwards.
    pub fn member_path(&self, id: MemberId) -> IndexResult<&[MemberId]> {
        let node = self.node(id)?;
        let path = node.path.get_or_init(|| {
            let mut path = vec![id];
            let mut current = id;
            while let Some(parent) = self.nodes[current.index()].parent {
                path.push(parent);
                current = parent;
            }
            path.reverse();
            path
        });
        Ok(path)
    }

    pub fn parent_count(&self, id: MemberId) -> IndexResult<usize> {
        Ok(self.member_path(id)?.len() - 1)
    }

    /// Outermost ancestor, `None` for top-level members
    pub fn top_most_parent(&self, id: MemberId) -> IndexResult<Option<MemberId>> {
        let path = self.member_path(id)?;
        Ok((path.len() > 1).then(|| path[0]))
    }

    pub fn key(&self, id: MemberId) -> IndexResult<MemberKey> {
        let path = self.member_path(id)?;
        let member = &self.nodes[id.index()].member;
        let ancestry = path[..path.len() - 1]
            .iter()
            .map(|ancestor| self.nodes[ancestor.index()].member.full_name())
            .collect();

        Ok(MemberKey {
            full_name: member.full_name(),
            class_method: member.is_class_method(),
            ancestry,
        })
    }

    /// Nearest enclosing class or module
    pub fn enclosing_parent(&self, id: MemberId) -> Option<MemberId> {
        let mut current = self.parent(id)?;
        loop {
            if self.nodes[current.index()].member.is_parent() {
                return Some(current);
            }
            current = self.parent(current)?;
        }
    }

    /// Methods declared directly in `id`
    pub fn declared_methods(&self, id: MemberId) -> impl Iterator<Item = MemberId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.nodes[child.index()].member.is_method())
    }

    pub fn accept(&self, id: MemberId, visitor: &mut dyn MemberVisitor) {
        let Ok(node) = self.node(id) else {
            return;
        };
        match node.member.kind() {
            MemberKind::Module => visitor.visit_module(self, id),
            MemberKind::Class { .. } => visitor.visit_class(self, id),
            MemberKind::Method(_) => visitor.visit_method(self, id),
            MemberKind::Root => visitor.visit_root(self, id),
            MemberKind::Keyword => visitor.visit_keyword(self, id),
            MemberKind::Problem(problem) => visitor.visit_problem(self, id, problem),
            MemberKind::ImplicitSelfCall => visitor.visit_implicit_self_call(self, id),
        }
    }

    /// Visits every member in pre-order
    pub fn visit_members(&self, visitor: &mut dyn MemberVisitor) -> IndexResult<()> {
        self.ensure_parsed()?;
        for id in self.member_list() {
            self.accept(*id, visitor);
        }
        Ok(())
    }

    pub fn classes(&self) -> IndexResult<Vec<MemberId>> {
        self.ensure_parsed()?;
        Ok(self
            .member_list()
            .iter()
            .copied()
            .filter(|id| {
                matches!(
                    self.nodes[id.index()].member.kind(),
                    MemberKind::Class { .. }
                )
            })
            .collect())
    }

    /// Top-level members starting before `offset_limit`, followed by every problem
    pub fn combine_members_and_problems(&self, offset_limit: usize) -> IndexResult<Vec<MemberId>> {
        let mut combined: Vec<MemberId> = self
            .members()?
            .iter()
            .copied()
            .filter(|id| self.nodes[id.index()].member.span().start() < offset_limit)
            .collect();
        combined.extend(self.problems.iter().copied());
        Ok(combined)
    }

    fn span_of(&self, id: MemberId) -> crate::types::Span {
        self.nodes[id.index()].member.span()
    }

    /// Innermost member whose `[start_outer, end]` contains `offset`, or the root
    pub fn member_at(&self, offset: usize) -> IndexResult<MemberId> {
        self.ensure_parsed()?;
        Ok(self
            .member_list()
            .iter()
            .rev()
            .find(|id| self.span_of(**id).contains(offset))
            .copied()
            .unwrap_or(self.root))
    }

    fn current_index(&self, offset: usize) -> Option<usize> {
        self.member_list()
            .partition_point(|id| self.span_of(*id).start_outer() <= offset)
            .checked_sub(1)
    }

    /// Last member starting at or before `offset`
    pub fn last_member_before(&self, offset: usize) -> IndexResult<Option<MemberId>> {
        self.ensure_parsed()?;
        Ok(self.current_index(offset).map(|index| self.member_list()[index]))
    }

    /// Member after the one at `offset`; the first member when `offset`
    /// precedes all members
    pub fn next_member(&self, offset: usize) -> IndexResult<Option<MemberId>> {
        self.ensure_parsed()?;
        let list = self.member_list();
        let next = match self.current_index(offset) {
            None => list.first(),
            Some(index) => list.get(index + 1),
        };
        Ok(next.copied())
    }

    /// The current member, unless `offset` is exactly at its name, in which
    /// case the member before it
    pub fn previous_member(&self, offset: usize) -> IndexResult<Option<MemberId>> {
        self.ensure_parsed()?;
        let list = self.member_list();
        let Some(index) = self.current_index(offset) else {
            return Ok(None);
        };

        if offset != self.span_of(list[index]).start() {
            Ok(Some(list[index]))
        } else {
            Ok(index.checked_sub(1).map(|previous| list[previous]))
        }
    }
}
