//! String-keyed map that iterates in first-insertion order.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub(crate) struct InsertionOrdered<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for InsertionOrdered<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> InsertionOrdered<V> {
    /// Return the value for `key`, inserting `make()` at the end on first use.
    pub(crate) fn entry_or_insert_with(
        &mut self,
        key: &str,
        make: impl FnOnce() -> V,
    ) -> &mut V {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push((key.to_string(), make()));
                self.index.insert(key.to_string(), slot);
                slot
            }
        };
        &mut self.entries[slot].1
    }

    pub(crate) fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Default> InsertionOrdered<V> {
    pub(crate) fn entry(&mut self, key: &str) -> &mut V {
        self.entry_or_insert_with(key, V::default)
    }
}
