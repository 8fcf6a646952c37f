use crate::types::{MethodId, ParentId};
use std::collections::{BTreeSet, HashMap};

/// Methods available on each class or module, inherited ones included
#[derive(Debug, Default, Clone)]
pub(crate) struct ParentToMethods {
    methods: HashMap<ParentId, BTreeSet<MethodId>>,
}

impl ParentToMethods {
    pub(crate) fn add(&mut self, parent: ParentId, method: MethodId) {
        self.methods.entry(parent).or_default().insert(method);
    }

    /// Replaces everything known for `parent`
    pub(crate) fn set(&mut self, parent: ParentId, methods: BTreeSet<MethodId>) {
        self.methods.insert(parent, methods);
    }

    pub(crate) fn get(&self, parent: ParentId) -> impl Iterator<Item = MethodId> + '_ {
        self.methods.get(&parent).into_iter().flatten().copied()
    }
}
