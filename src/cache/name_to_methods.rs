use crate::types::MethodId;
use std::collections::{BTreeSet, HashMap};

/// Short method name to every method declared with that name
#[derive(Debug, Default, Clone)]
pub(crate) struct NameToMethods {
    by_name: HashMap<String, BTreeSet<MethodId>>,
}

impl NameToMethods {
    pub(crate) fn add(&mut self, short_name: &str, method: MethodId) {
        self.by_name
            .entry(short_name.to_string())
            .or_default()
            .insert(method);
    }

    pub(crate) fn get(&self, short_name: &str) -> impl Iterator<Item = MethodId> + '_ {
        self.by_name.get(short_name).into_iter().flatten().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_name.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_set_like() {
        let mut index = NameToMethods::default();
        let id = MethodId::new(1).unwrap();
        index.add("red", id);
        index.add("red", id);
        index.add("blue", MethodId::new(2).unwrap());

        assert_eq!(index.get("red").collect::<Vec<_>>(), vec![id]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("green").count(), 0);
    }
}
