//! Stored records and the snapshots handed out by queries

use crate::member::{Member, MemberKey, MemberKind};
use crate::types::{MethodId, ParentId};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub(crate) struct MethodRecord {
    pub(crate) member: Member,
    pub(crate) key: MemberKey,
    pub(crate) owner: Option<ParentId>,
    pub(crate) return_types: Option<BTreeSet<ParentId>>,
    /// Source method of a class-method copy made for a mixin
    pub(crate) promoted_from: Option<MethodId>,
}

#[derive(Debug, Clone)]
pub(crate) struct ParentRecord {
    pub(crate) member: Member,
    pub(crate) files: BTreeSet<PathBuf>,
    /// Registered on demand for a return type, not seen in any file yet
    pub(crate) synthetic: bool,
}

/// Snapshot of a cached method.
///
/// Equality follows the structural key, so the same method seen through
/// different queries compares equal.
#[derive(Debug, Clone)]
pub struct Method {
    pub(crate) id: MethodId,
    pub(crate) member: Member,
    pub(crate) key: MemberKey,
    pub(crate) owner: Option<String>,
    pub(crate) return_types: Option<Vec<String>>,
    pub(crate) promoted: bool,
}

impl Method {
    pub fn id(&self) -> MethodId {
        self.id
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    pub fn full_name(&self) -> String {
        self.member.full_name()
    }

    pub fn short_name(&self) -> &str {
        self.member.short_name()
    }

    pub fn file_name(&self) -> &str {
        self.member
            .method_data()
            .map(|data| data.file_name.as_str())
            .unwrap_or_default()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.member
            .method_data()
            .map(|data| data.file_path.as_path())
    }

    pub fn is_class_method(&self) -> bool {
        self.member.is_class_method().unwrap_or(false)
    }

    /// Full name of the class or module declaring the method
    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Full names of the possible return types, `None` when undetermined
    pub fn return_types(&self) -> Option<&[String]> {
        self.return_types.as_deref()
    }

    /// Class-method copy of a method from a framework mixin module
    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    /// Completion list order: full name, then file name
    pub fn listing_order(a: &Method, b: &Method) -> Ordering {
        a.full_name()
            .cmp(&b.full_name())
            .then_with(|| a.file_name().cmp(b.file_name()))
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Method {}

impl Hash for Method {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Snapshot of a cached class or module, merged across every file that
/// declares it
#[derive(Debug, Clone)]
pub struct ParentMember {
    pub(crate) id: ParentId,
    pub(crate) member: Member,
    pub(crate) files: Vec<PathBuf>,
    pub(crate) synthetic: bool,
}

impl ParentMember {
    pub fn id(&self) -> ParentId {
        self.id
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn full_name(&self) -> String {
        self.member.full_name()
    }

    pub fn short_name(&self) -> &str {
        self.member.short_name()
    }

    pub fn is_class(&self) -> bool {
        matches!(self.member.kind(), MemberKind::Class { .. })
    }

    pub fn is_module(&self) -> bool {
        matches!(self.member.kind(), MemberKind::Module)
    }

    pub fn super_class_name(&self) -> Option<&str> {
        self.member.super_class_name()
    }

    pub fn documentation(&self) -> Option<&str> {
        self.member.documentation()
    }

    /// Files declaring this parent, sorted
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// True for built-in types registered while resolving return types
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

impl PartialEq for ParentMember {
    fn eq(&self, other: &Self) -> bool {
        self.full_name() == other.full_name()
    }
}

impl Eq for ParentMember {}

/// Entry of [`SymbolCache::all_members`](super::SymbolCache::all_members)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheMember {
    Parent(ParentMember),
    Method(Method),
}

impl CacheMember {
    pub fn full_name(&self) -> String {
        match self {
            CacheMember::Parent(parent) => parent.full_name(),
            CacheMember::Method(method) => method.full_name(),
        }
    }

    pub fn member(&self) -> &Member {
        match self {
            CacheMember::Parent(parent) => parent.member(),
            CacheMember::Method(method) => method.member(),
        }
    }
}
