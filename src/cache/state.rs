//! Index state guarded by the cache lock

use super::method_to_parents::MethodToParents;
use super::name_to_methods::NameToMethods;
use super::name_to_parents::NameToParents;
use super::parent_to_immediate_methods::ParentToImmediateMethods;
use super::parent_to_methods::ParentToMethods;
use super::records::{CacheMember, Method, MethodRecord, ParentMember, ParentRecord};
use crate::member::{Member, MemberKey, MemberTree, MemberVisitor};
use crate::types::{MemberId, MethodId, ParentId};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
enum MemberRef {
    Parent(ParentId),
    Method(MethodId),
}

#[derive(Debug, Default)]
pub(crate) struct CacheState {
    pub(crate) methods: Vec<MethodRecord>,
    pub(crate) parents: Vec<ParentRecord>,
    pub(crate) method_keys: HashMap<MemberKey, MethodId>,
    /// Mixin method to its class-method copy
    pub(crate) promoted: HashMap<MethodId, MethodId>,
    pub(crate) name_to_methods: NameToMethods,
    pub(crate) name_to_parents: NameToParents,
    pub(crate) method_to_parents: MethodToParents,
    pub(crate) parent_to_immediate_methods: ParentToImmediateMethods,
    pub(crate) parent_to_methods: ParentToMethods,
    all_methods: Option<Vec<MethodId>>,
    all_members: Option<Vec<MemberRef>>,
}

/// Counts of members registered by one `add_members` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddSummary {
    pub parents: usize,
    pub methods: usize,
}

struct Registrar<'a> {
    state: &'a mut CacheState,
    path: &'a Path,
    summary: AddSummary,
}

impl MemberVisitor for Registrar<'_> {
    fn visit_module(&mut self, tree: &MemberTree, id: MemberId) {
        self.register_parent(tree, id);
    }

    fn visit_class(&mut self, tree: &MemberTree, id: MemberId) {
        self.register_parent(tree, id);
    }

    fn visit_method(&mut self, tree: &MemberTree, id: MemberId) {
        self.register_method(tree, id);
    }
}

impl Registrar<'_> {
    fn register_parent(&mut self, tree: &MemberTree, id: MemberId) {
        let Some(member) = tree.member(id) else {
            return;
        };
        let parent = self.state.merge_parent(member);
        self.state.parents[parent.index()]
            .files
            .insert(self.path.to_path_buf());
        self.summary.parents += 1;
    }

    fn register_method(&mut self, tree: &MemberTree, id: MemberId) {
        let (Some(member), Ok(key)) = (tree.member(id), tree.key(id)) else {
            return;
        };
        let owner = tree
            .enclosing_parent(id)
            .and_then(|parent| tree.member(parent))
            .and_then(|parent| self.state.name_to_parents.by_full_name(&parent.full_name()));

        let state = &mut *self.state;
        let method = match state.method_keys.get(&key) {
            Some(&existing) => {
                // Latest occurrence wins
                let record = &mut state.methods[existing.index()];
                record.member = member.clone();
                record.owner = owner;
                record.return_types = None;
                if let Some(&copy) = state.promoted.get(&existing) {
                    state.methods[copy.index()].member = member.promoted_to_class_method();
                }
                existing
            }
            None => {
                let method = MethodId::from_index(state.methods.len());
                state.methods.push(MethodRecord {
                    member: member.clone(),
                    key: key.clone(),
                    owner,
                    return_types: None,
                    promoted_from: None,
                });
                state.method_keys.insert(key, method);
                method
            }
        };

        let short_name = member.short_name();
        state.name_to_methods.add(short_name, method);
        if let Some(owner) = owner {
            state.method_to_parents.add_declared(short_name, owner);
            state.parent_to_immediate_methods.add(owner, method);
            state.parent_to_methods.add(owner, method);
        }
        self.summary.methods += 1;
    }
}

impl CacheState {
    pub(crate) fn is_populated(&self) -> bool {
        !self.parents.is_empty() || !self.methods.is_empty()
    }

    pub(crate) fn add_members(&mut self, tree: &MemberTree, path: &Path) -> AddSummary {
        let mut registrar = Registrar {
            state: self,
            path,
            summary: AddSummary::default(),
        };
        for &id in tree.member_list() {
            tree.accept(id, &mut registrar);
        }
        let summary = registrar.summary;
        self.invalidate();
        summary
    }

    /// Drops the memoized views. Called by every mutation.
    pub(crate) fn invalidate(&mut self) {
        self.all_methods = None;
        self.all_members = None;
    }

    /// Registers `member` or merges it into the parent with the same full name
    fn merge_parent(&mut self, member: &Member) -> ParentId {
        let full_name = member.full_name();
        let Some(existing) = self.name_to_parents.by_full_name(&full_name) else {
            return self.insert_parent(member.clone(), false);
        };

        let record = &mut self.parents[existing.index()];
        if record.synthetic {
            record.member = member.clone();
            record.synthetic = false;
        } else {
            let has_documentation = record
                .member
                .documentation()
                .is_some_and(|doc| !doc.is_empty());
            if let Some(doc) = member.documentation().filter(|doc| !doc.is_empty()) {
                if !has_documentation {
                    record.member.set_documentation(doc);
                }
            }
            if let Some(super_class) = member.super_class_name() {
                record.member.fill_super_class(super_class);
            }
        }
        self.name_to_parents
            .insert(&full_name, member.short_name(), existing);
        existing
    }

    pub(crate) fn insert_parent(&mut self, member: Member, synthetic: bool) -> ParentId {
        let parent = ParentId::from_index(self.parents.len());
        self.name_to_parents
            .insert(&member.full_name(), member.short_name(), parent);
        self.parents.push(ParentRecord {
            member,
            files: BTreeSet::new(),
            synthetic,
        });
        parent
    }

    pub(crate) fn method_view(&self, id: MethodId) -> Method {
        let record = &self.methods[id.index()];
        let return_types = record.return_types.as_ref().map(|types| {
            let mut names: Vec<String> = types
                .iter()
                .map(|parent| self.parents[parent.index()].member.full_name())
                .collect();
            names.sort();
            names
        });

        Method {
            id,
            member: record.member.clone(),
            key: record.key.clone(),
            owner: record
                .owner
                .map(|owner| self.parents[owner.index()].member.full_name()),
            return_types,
            promoted: record.promoted_from.is_some(),
        }
    }

    pub(crate) fn parent_view(&self, id: ParentId) -> ParentMember {
        let record = &self.parents[id.index()];
        ParentMember {
            id,
            member: record.member.clone(),
            files: record.files.iter().cloned().collect::<Vec<PathBuf>>(),
            synthetic: record.synthetic,
        }
    }

    pub(crate) fn sorted_methods(&self, ids: impl IntoIterator<Item = MethodId>) -> Vec<Method> {
        let mut methods: Vec<Method> = ids.into_iter().map(|id| self.method_view(id)).collect();
        methods.sort_by(Method::listing_order);
        methods
    }

    pub(crate) fn sorted_parents(&self, ids: impl IntoIterator<Item = ParentId>) -> Vec<ParentMember> {
        let mut parents: Vec<ParentMember> = ids.into_iter().map(|id| self.parent_view(id)).collect();
        parents.sort_by_key(ParentMember::full_name);
        parents
    }

    /// Immediate methods of every parent, parents in full name order
    pub(crate) fn all_methods(&mut self) -> Vec<Method> {
        if self.all_methods.is_none() {
            let ids = self
                .name_to_parents
                .iter()
                .flat_map(|(_, parent)| self.immediate_in_order(parent))
                .collect();
            self.all_methods = Some(ids);
        }
        self.all_methods
            .iter()
            .flatten()
            .map(|&id| self.method_view(id))
            .collect()
    }

    /// Every parent followed by its immediate methods
    pub(crate) fn all_members(&mut self) -> Vec<CacheMember> {
        if self.all_members.is_none() {
            let refs = self
                .name_to_parents
                .iter()
                .flat_map(|(_, parent)| {
                    std::iter::once(MemberRef::Parent(parent)).chain(
                        self.immediate_in_order(parent)
                            .into_iter()
                            .map(MemberRef::Method),
                    )
                })
                .collect();
            self.all_members = Some(refs);
        }
        self.all_members
            .iter()
            .flatten()
            .map(|member| match *member {
                MemberRef::Parent(id) => CacheMember::Parent(self.parent_view(id)),
                MemberRef::Method(id) => CacheMember::Method(self.method_view(id)),
            })
            .collect()
    }

    fn immediate_in_order(&self, parent: ParentId) -> Vec<MethodId> {
        self.sorted_methods(self.parent_to_immediate_methods.get(parent))
            .into_iter()
            .map(|method| method.id)
            .collect()
    }
}
