use crate::types::{MethodId, ParentId};
use std::collections::{BTreeSet, HashMap};

/// Methods declared directly in each class or module, across all files
#[derive(Debug, Default, Clone)]
pub(crate) struct ParentToImmediateMethods {
    methods: HashMap<ParentId, BTreeSet<MethodId>>,
}

impl ParentToImmediateMethods {
    pub(crate) fn add(&mut self, parent: ParentId, method: MethodId) {
        self.methods.entry(parent).or_default().insert(method);
    }

    pub(crate) fn get(&self, parent: ParentId) -> impl Iterator<Item = MethodId> + '_ {
        self.methods.get(&parent).into_iter().flatten().copied()
    }
}
