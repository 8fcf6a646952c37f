use crate::types::ParentId;
use std::collections::{BTreeMap, HashMap};

/// Registry of every class and module, by full name and by short name.
///
/// A short name maps to the most recently registered parent with that name.
#[derive(Debug, Default, Clone)]
pub(crate) struct NameToParents {
    by_full_name: BTreeMap<String, ParentId>,
    by_short_name: HashMap<String, ParentId>,
}

impl NameToParents {
    pub(crate) fn insert(&mut self, full_name: &str, short_name: &str, parent: ParentId) {
        self.by_full_name.insert(full_name.to_string(), parent);
        self.by_short_name.insert(short_name.to_string(), parent);
    }

    pub(crate) fn by_full_name(&self, full_name: &str) -> Option<ParentId> {
        self.by_full_name.get(full_name).copied()
    }

    pub(crate) fn by_short_name(&self, short_name: &str) -> Option<ParentId> {
        self.by_short_name.get(short_name).copied()
    }

    /// Full name first, then short name
    pub(crate) fn resolve(&self, name: &str) -> Option<ParentId> {
        self.by_full_name(name)
            .or_else(|| self.by_short_name(name))
    }

    /// Parents ordered by full name
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, ParentId)> + '_ {
        self.by_full_name
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
    }

    pub(crate) fn starting_with(&self, prefix: &str, ignore_case: bool) -> Vec<ParentId> {
        if ignore_case {
            let prefix = prefix.to_lowercase();
            self.iter()
                .filter(|(name, _)| name.to_lowercase().starts_with(&prefix))
                .map(|(_, id)| id)
                .collect()
        } else {
            self.by_full_name
                .range(prefix.to_string()..)
                .take_while(|(name, _)| name.starts_with(prefix))
                .map(|(_, id)| *id)
                .collect()
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.by_full_name.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u32) -> ParentId {
        ParentId::new(value).unwrap()
    }

    #[test]
    fn test_resolve_prefers_full_name() {
        let mut registry = NameToParents::default();
        registry.insert("Colour::Green", "Green", id(1));
        registry.insert("Green", "Green", id(2));

        assert_eq!(registry.resolve("Green"), Some(id(2)));
        assert_eq!(registry.resolve("Colour::Green"), Some(id(1)));
        assert_eq!(registry.resolve("Blue"), None);
    }

    #[test]
    fn test_short_name_fallback() {
        let mut registry = NameToParents::default();
        registry.insert("Colour::Green", "Green", id(1));
        assert_eq!(registry.resolve("Green"), Some(id(1)));
    }

    #[test]
    fn test_starting_with() {
        let mut registry = NameToParents::default();
        registry.insert("Green", "Green", id(1));
        registry.insert("Grey", "Grey", id(2));
        registry.insert("Red", "Red", id(3));
        registry.insert("green_house", "green_house", id(4));

        assert_eq!(registry.starting_with("Gr", false), vec![id(1), id(2)]);
        assert_eq!(registry.starting_with("gr", true), vec![id(1), id(2), id(4)]);
        assert!(registry.starting_with("Z", true).is_empty());
    }
}
