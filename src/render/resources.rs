use std::collections::BTreeMap;

/// Keyed owner of GPU resources.
///
/// Scene instances refer to entries by key only; the table is the single
/// owner and tracks how many resources it created and released so shutdown
/// can report leaks.
#[derive(Debug)]
pub struct ResourceTable<K, V> {
    label: &'static str,
    entries: BTreeMap<K, V>,
    created: usize,
    released: usize,
}

impl<K: Ord + Copy, V> ResourceTable<K, V> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: BTreeMap::new(),
            created: 0,
            released: 0,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Stores `value` under `key`, releasing any previous entry.
    pub fn insert(&mut self, key: K, value: V) {
        self.created += 1;
        if self.entries.insert(key, value).is_some() {
            self.released += 1;
        }
    }

    /// Returns the entry for `key`, creating it with `create` on first use.
    pub fn get_or_insert_with(&mut self, key: K, create: impl FnOnce() -> V) -> &V {
        if !self.entries.contains_key(&key) {
            self.insert(key, create());
        }
        &self.entries[&key]
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn released(&self) -> usize {
        self.released
    }

    /// Drops every entry. Returns how many were released by this call.
    pub fn release_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.released += count;
        count
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn release_all_balances_counters() {
        let drops = Rc::new(Cell::new(0));
        let mut table = ResourceTable::new("meshes");
        for key in 0..6u8 {
            table.insert(key, Tracked(Rc::clone(&drops)));
        }
        assert_eq!(table.len(), 6);
        assert_eq!(table.release_all(), 6);
        assert_eq!(table.created(), table.released());
        assert_eq!(drops.get(), 6);
        assert!(table.is_empty());
    }

    #[test]
    fn shared_keys_create_once() {
        let mut table = ResourceTable::new("textures");
        let mut calls = 0;
        for key in ["lid", "salt", "lid"] {
            table.get_or_insert_with(key, || {
                calls += 1;
                key.len()
            });
        }
        assert_eq!(calls, 2);
        assert_eq!(table.created(), 2);
        assert_eq!(table.get("lid"), Some(&3));
    }

    #[test]
    fn replacing_an_entry_releases_the_old_one() {
        let mut table = ResourceTable::new("meshes");
        table.insert(1u8, "a");
        table.insert(1u8, "b");
        assert_eq!(table.created(), 2);
        assert_eq!(table.released(), 1);
        assert_eq!(table.get(1), Some(&"b"));
    }
}
