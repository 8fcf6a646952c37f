use crate::types::ParentId;
use std::collections::{BTreeSet, HashMap};

/// Short method name to the parents that declare or inherit it.
///
/// Inherited owners are kept apart so every propagation pass can rebuild them.
#[derive(Debug, Default, Clone)]
pub(crate) struct MethodToParents {
    declared: HashMap<String, BTreeSet<ParentId>>,
    inherited: HashMap<String, BTreeSet<ParentId>>,
}

impl MethodToParents {
    pub(crate) fn add_declared(&mut self, short_name: &str, parent: ParentId) {
        self.declared
            .entry(short_name.to_string())
            .or_default()
            .insert(parent);
    }

    pub(crate) fn add_inherited(&mut self, short_name: &str, parent: ParentId) {
        self.inherited
            .entry(short_name.to_string())
            .or_default()
            .insert(parent);
    }

    pub(crate) fn clear_inherited(&mut self) {
        self.inherited.clear();
    }

    pub(crate) fn get(&self, short_name: &str) -> BTreeSet<ParentId> {
        self.declared
            .get(short_name)
            .into_iter()
            .chain(self.inherited.get(short_name))
            .flatten()
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_and_inherited_union() {
        let mut index = MethodToParents::default();
        let a = ParentId::new(1).unwrap();
        let b = ParentId::new(2).unwrap();
        index.add_declared("m1", a);
        index.add_inherited("m1", b);
        index.add_inherited("m1", a);

        assert_eq!(index.get("m1"), BTreeSet::from([a, b]));

        index.clear_inherited();
        assert_eq!(index.get("m1"), BTreeSet::from([a]));
        assert!(index.get("m2").is_empty());
    }
}
