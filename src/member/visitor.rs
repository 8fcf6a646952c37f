//! Visitor over the closed set of member variants

use super::{MemberTree, Problem};
use crate::types::MemberId;

/// Callback per member variant. Every method defaults to a no-op so
/// implementors only handle the variants they care about.
///
/// Dispatch happens in [`MemberTree::accept`], which matches exhaustively on
/// [`MemberKind`](super::MemberKind).
#[allow(unused_variables)]
pub trait MemberVisitor {
    fn visit_module(&mut self, tree: &MemberTree, id: MemberId) {}

    fn visit_class(&mut self, tree: &MemberTree, id: MemberId) {}

    fn visit_method(&mut self, tree: &MemberTree, id: MemberId) {}

    fn visit_root(&mut self, tree: &MemberTree, id: MemberId) {}

    fn visit_keyword(&mut self, tree: &MemberTree, id: MemberId) {}

    fn visit_problem(&mut self, tree: &MemberTree, id: MemberId, problem: &Problem) {}

    fn visit_implicit_self_call(&mut self, tree: &MemberTree, id: MemberId) {}
}
