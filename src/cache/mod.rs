//! Project-wide symbol cache
//!
//! The cache merges the member trees of every indexed file into five
//! indices:
//! - short method name to methods
//! - class/module name to the merged parent entity
//! - method name to owning parents, inherited owners included
//! - parent to its declared methods
//! - parent to every available method, inherited ones included
//!
//! A [`SymbolCache`] is a cheap handle; clones share the same state. Every
//! public operation takes one lock for its whole duration, so callers never
//! observe a partially applied `add_members` or propagation pass.

mod conventions;
mod method_to_parents;
mod name_to_methods;
mod name_to_parents;
mod parent_to_immediate_methods;
mod parent_to_methods;
mod propagation;
mod records;
mod state;

pub use conventions::FrameworkConvention;
pub use propagation::PropagationStats;
pub use records::{CacheMember, Method, ParentMember};
pub use state::AddSummary;

use crate::config::Settings;
use crate::error::{IndexError, IndexResult};
use crate::member::{MemberKind, MemberTree};
use parking_lot::Mutex;
use state::CacheState;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Sizes of the cache indices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub parents: usize,
    pub methods: usize,
    pub named_methods: usize,
}

#[derive(Clone, Debug)]
pub struct SymbolCache {
    state: Arc<Mutex<CacheState>>,
    settings: Arc<Settings>,
}

impl SymbolCache {
    pub fn new() -> Self {
        Self::with_settings(Arc::new(Settings::default()))
    }

    pub fn with_settings(settings: Arc<Settings>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Merges the classes, modules and methods of `tree` into the cache.
    ///
    /// Returns `None` and leaves the cache untouched when the tree comes from
    /// a failed parse. Adding the same tree again changes nothing.
    pub fn add_members(&self, tree: &MemberTree, path: impl AsRef<Path>) -> Option<AddSummary> {
        let path = path.as_ref();
        if tree.contains_errors() {
            tracing::warn!(path = %path.display(), "skipping member tree with parse errors");
            return None;
        }

        let summary = self.state.lock().add_members(tree, path);
        tracing::debug!(
            path = %path.display(),
            parents = summary.parents,
            methods = summary.methods,
            "added members"
        );
        Some(summary)
    }

    /// Class named `name`, by full name first and then by short name. A module
    /// matching one lookup does not hide a class matching the other.
    pub fn get_class(&self, name: &str) -> Option<ParentMember> {
        let state = self.state.lock();
        let parents = &state.name_to_parents;
        [parents.by_full_name(name), parents.by_short_name(name)]
            .into_iter()
            .flatten()
            .map(|parent| state.parent_view(parent))
            .find(ParentMember::is_class)
    }

    /// Class or module named `name`, by full name first and then by short name
    pub fn get_parent_member(&self, name: &str) -> Option<ParentMember> {
        let state = self.state.lock();
        state
            .name_to_parents
            .resolve(name)
            .map(|parent| state.parent_view(parent))
    }

    /// Methods with short name `name`, in listing order
    pub fn get_methods(&self, name: &str) -> Vec<Method> {
        let state = self.state.lock();
        state.sorted_methods(state.name_to_methods.get(name))
    }

    /// Parents declaring or inheriting a method named `method_name`, by full name
    pub fn get_members_with_method(&self, method_name: &str) -> Vec<ParentMember> {
        let state = self.state.lock();
        state.sorted_parents(state.method_to_parents.get(method_name))
    }

    /// Methods available on the parent `name`, inherited ones included once
    /// propagation has run
    pub fn get_methods_of_member(&self, name: &str) -> Vec<Method> {
        let state = self.state.lock();
        match state.name_to_parents.resolve(name) {
            Some(parent) => state.sorted_methods(state.parent_to_methods.get(parent)),
            None => Vec::new(),
        }
    }

    /// Methods declared directly in the parent `name`
    pub fn get_immediate_methods_of_member(&self, name: &str) -> Vec<Method> {
        let state = self.state.lock();
        match state.name_to_parents.resolve(name) {
            Some(parent) => state.sorted_methods(state.parent_to_immediate_methods.get(parent)),
            None => Vec::new(),
        }
    }

    /// Parents whose full name starts with `prefix`, in the registry's order
    pub fn get_parents_starting_with(&self, prefix: &str, ignore_case: bool) -> Vec<ParentMember> {
        let state = self.state.lock();
        state
            .name_to_parents
            .starting_with(prefix, ignore_case)
            .into_iter()
            .map(|parent| state.parent_view(parent))
            .collect()
    }

    /// Declared methods of every parent, parents in full name order
    pub fn all_methods(&self) -> IndexResult<Vec<Method>> {
        let mut state = self.state.lock();
        if !state.is_populated() {
            return Err(IndexError::CacheNotPopulated {
                operation: "all_methods",
            });
        }
        Ok(state.all_methods())
    }

    /// Every parent followed by its declared methods
    pub fn all_members(&self) -> IndexResult<Vec<CacheMember>> {
        let mut state = self.state.lock();
        if !state.is_populated() {
            return Err(IndexError::CacheNotPopulated {
                operation: "all_members",
            });
        }
        Ok(state.all_members())
    }

    /// Methods available on any of `parent_names`, or every declared method
    /// when no names are given
    pub fn methods_of_parents(&self, parent_names: Option<&[&str]>) -> Vec<Method> {
        let mut state = self.state.lock();
        let Some(names) = parent_names else {
            return state.all_methods();
        };

        let ids: BTreeSet<_> = names
            .iter()
            .filter_map(|name| state.name_to_parents.resolve(name))
            .flat_map(|parent| state.parent_to_methods.get(parent))
            .collect();
        state.sorted_methods(ids)
    }

    /// Parents providing every one of `method_names`
    pub fn common_parents_with_methods(&self, method_names: &[&str]) -> Vec<ParentMember> {
        let state = self.state.lock();
        let mut names = method_names.iter();
        let Some(first) = names.next() else {
            return Vec::new();
        };

        let mut common = state.method_to_parents.get(first);
        for name in names {
            let owners = state.method_to_parents.get(name);
            common.retain(|parent| owners.contains(parent));
        }
        state.sorted_parents(common)
    }

    /// Documentation of a class or module headed by its ancestry, e.g.
    /// `Class: Green < Colour`. The chain stops at `Object`, at an unknown
    /// superclass or at a repeated ancestor.
    pub fn class_documentation(&self, name: &str) -> Option<String> {
        let state = self.state.lock();
        let parent = state.name_to_parents.resolve(name)?;
        let member = &state.parents[parent.index()].member;

        let mut header = match member.kind() {
            MemberKind::Module => format!("Module: {}", member.full_name()),
            _ => format!("Class: {}", member.full_name()),
        };

        let mut visited = BTreeSet::from([parent]);
        let mut next = member.super_class_name();
        while let Some(super_name) = next {
            let Some(ancestor) = state.name_to_parents.resolve(super_name) else {
                break;
            };
            let ancestor_member = &state.parents[ancestor.index()].member;
            if !visited.insert(ancestor) || ancestor_member.full_name() == "Object" {
                break;
            }
            header.push_str(" < ");
            header.push_str(&ancestor_member.full_name());
            next = ancestor_member.super_class_name();
        }

        match member.documentation().filter(|doc| !doc.is_empty()) {
            Some(doc) => Some(format!("{header}\n\n{doc}")),
            None => Some(header),
        }
    }

    /// Copies ancestor and mixin methods into every class's available
    /// methods, then infers return types for every method.
    pub fn populate_superclass_methods(&self) -> IndexResult<PropagationStats> {
        let mut state = self.state.lock();
        if !state.is_populated() {
            return Err(IndexError::CacheNotPopulated {
                operation: "populate_superclass_methods",
            });
        }

        let stats = state.populate_superclass_methods(&self.settings);
        tracing::info!(
            classes = stats.classes,
            inherited = stats.inherited_methods,
            mixins = stats.mixin_methods,
            unresolved = stats.unresolved_superclasses,
            cycles = stats.cycles,
            typed = stats.methods_with_return_types,
            "populated superclass methods"
        );
        Ok(stats)
    }

    /// Discards every index
    pub fn reset(&self) {
        *self.state.lock() = CacheState::default();
        tracing::debug!("symbol cache reset");
    }

    pub fn is_populated(&self) -> bool {
        self.state.lock().is_populated()
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            parents: state.name_to_parents.len(),
            methods: state.method_keys.len(),
            named_methods: state.name_to_methods.len(),
        }
    }
}

impl Default for SymbolCache {
    fn default() -> Self {
        Self::new()
    }
}
