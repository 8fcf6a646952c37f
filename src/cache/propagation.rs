//! Superclass and mixin propagation, followed by return-type inference

use super::records::MethodRecord;
use super::state::CacheState;
use crate::config::Settings;
use crate::inference::{ReturnType, infer_return_types};
use crate::member::{Member, MemberKind};
use crate::types::{MethodId, ParentId};
use std::collections::{BTreeSet, HashSet};

/// What one propagation pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Classes whose superclass chain was walked
    pub classes: usize,
    /// Methods inherited from resolved ancestors
    pub inherited_methods: usize,
    /// Class methods contributed by framework mixin modules
    pub mixin_methods: usize,
    /// Chains that ended at a superclass name missing from the cache
    pub unresolved_superclasses: usize,
    /// Chains cut short because an ancestor repeated
    pub cycles: usize,
    /// Methods left with a known return-type set
    pub methods_with_return_types: usize,
}

impl CacheState {
    pub(crate) fn populate_superclass_methods(&mut self, settings: &Settings) -> PropagationStats {
        let mut stats = PropagationStats::default();
        self.method_to_parents.clear_inherited();

        for index in 0..self.parents.len() {
            let parent = ParentId::from_index(index);
            let declared: BTreeSet<MethodId> = self.parent_to_immediate_methods.get(parent).collect();
            let mut available = declared.clone();

            if matches!(self.parents[index].member.kind(), MemberKind::Class { .. }) {
                stats.classes += 1;
                for method in self.collect_inherited(parent, &declared, settings, &mut stats) {
                    let short_name = self.methods[method.index()].member.short_name().to_string();
                    self.method_to_parents.add_inherited(&short_name, parent);
                    available.insert(method);
                }
            }
            self.parent_to_methods.set(parent, available);
        }

        stats.methods_with_return_types = self.infer_all_return_types(settings);
        self.invalidate();
        stats
    }

    /// Walks the superclass chain of `class`, nearest ancestor first. A method
    /// is taken only if no nearer declaration has the same short name.
    fn collect_inherited(
        &mut self,
        class: ParentId,
        declared: &BTreeSet<MethodId>,
        settings: &Settings,
        stats: &mut PropagationStats,
    ) -> Vec<MethodId> {
        let mut seen: HashSet<String> = declared
            .iter()
            .map(|method| self.methods[method.index()].member.short_name().to_string())
            .collect();
        let mut visited = HashSet::from([class]);
        let mut inherited = Vec::new();
        let mut next = self.super_class_of(class);

        while let Some(super_name) = next.take() {
            let ancestor = self.name_to_parents.resolve(&super_name);

            if let Some(ancestor) = ancestor {
                if !visited.insert(ancestor) {
                    tracing::debug!(
                        class = %self.parents[class.index()].member.full_name(),
                        superclass = %super_name,
                        "superclass cycle, stopping"
                    );
                    stats.cycles += 1;
                    break;
                }
                let candidates: Vec<MethodId> =
                    self.parent_to_immediate_methods.get(ancestor).collect();
                for method in candidates {
                    if self.claim(&mut seen, method) {
                        inherited.push(method);
                        stats.inherited_methods += 1;
                    }
                }
            }

            if let Some(convention) = settings.convention_for(&super_name) {
                for mixin in &convention.mixins {
                    let Some(module) = self.name_to_parents.resolve(mixin) else {
                        continue;
                    };
                    let candidates: Vec<MethodId> =
                        self.parent_to_immediate_methods.get(module).collect();
                    for source in candidates {
                        let method = self.promote(source);
                        if self.claim(&mut seen, method) {
                            inherited.push(method);
                            stats.mixin_methods += 1;
                        }
                    }
                }
            }

            match ancestor {
                Some(ancestor) => next = self.super_class_of(ancestor),
                None => stats.unresolved_superclasses += 1,
            }
        }

        inherited
    }

    fn super_class_of(&self, parent: ParentId) -> Option<String> {
        self.parents[parent.index()]
            .member
            .super_class_name()
            .map(str::to_string)
    }

    fn claim(&self, seen: &mut HashSet<String>, method: MethodId) -> bool {
        seen.insert(self.methods[method.index()].member.short_name().to_string())
    }

    /// Class-method copy of a mixin method, made once and reused
    fn promote(&mut self, source: MethodId) -> MethodId {
        if let Some(&copy) = self.promoted.get(&source) {
            return copy;
        }
        let record = &self.methods[source.index()];
        if record.member.is_class_method() == Some(true) {
            return source;
        }

        let member = record.member.promoted_to_class_method();
        let mut key = record.key.clone();
        key.full_name = member.full_name();
        key.class_method = Some(true);
        let copy = MethodRecord {
            member,
            key,
            owner: record.owner,
            return_types: None,
            promoted_from: Some(source),
        };

        let id = MethodId::from_index(self.methods.len());
        self.methods.push(copy);
        self.promoted.insert(source, id);
        id
    }

    /// Runs inference once per method. Returns how many methods got types.
    fn infer_all_return_types(&mut self, settings: &Settings) -> usize {
        if !settings.inference.enabled {
            for record in &mut self.methods {
                record.return_types = None;
            }
            return 0;
        }

        let mut inferred = 0;
        for index in 0..self.methods.len() {
            let record = &self.methods[index];
            let owner = record.owner;
            let guessed = annotation_text(&record.member, settings.inference.scan_documentation)
                .and_then(|text| infer_return_types(record.member.short_name(), text));

            let return_types = guessed
                .map(|types| {
                    types
                        .into_iter()
                        .filter_map(|return_type| match return_type {
                            ReturnType::Named(name) => Some(self.resolve_or_register(name)),
                            ReturnType::EnclosingClass => owner,
                        })
                        .collect::<BTreeSet<ParentId>>()
                })
                .filter(|types| !types.is_empty());

            if return_types.is_some() {
                inferred += 1;
            }
            self.methods[index].return_types = return_types;
        }
        inferred
    }

    /// Parent for a built-in type name, registered on first use
    fn resolve_or_register(&mut self, name: &str) -> ParentId {
        match self.name_to_parents.resolve(name) {
            Some(parent) => parent,
            None => {
                tracing::trace!(name, "registering return type");
                self.insert_parent(Member::class(name, Default::default()), true)
            }
        }
    }
}

/// Parameter text, or documentation when there is none
fn annotation_text(member: &Member, scan_documentation: bool) -> Option<&str> {
    let parameters = member
        .method_data()
        .and_then(|data| data.parameters.as_deref())
        .filter(|text| !text.is_empty());

    parameters.or_else(|| {
        scan_documentation
            .then(|| member.documentation())
            .flatten()
            .filter(|text| !text.is_empty())
    })
}
