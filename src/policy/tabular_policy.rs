use fxhash::FxHashMap;
use std::hash::Hash;

use crate::env::Action;

pub type ActionValues = [f64; Action::COUNT];

/// Action-value table with an implicit default for unseen states. Rows are
/// only materialized on the first write.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularPolicy<K: Hash + Eq + Clone> {
    default: ActionValues,
    values: FxHashMap<K, ActionValues>,
}

impl<K: Hash + Eq + Clone> Default for TabularPolicy<K> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<K: Hash + Eq + Clone> TabularPolicy<K> {
    pub fn new(default_value: f64) -> Self {
        Self {
            default: [default_value; Action::COUNT],
            values: FxHashMap::default(),
        }
    }

    pub fn get_values(&self, key: &K) -> ActionValues {
        *self.values.get(key).unwrap_or(&self.default)
    }

    pub fn get(&self, key: &K, action: Action) -> f64 {
        self.get_values(key)[action]
    }

    pub fn set(&mut self, key: &K, action: Action, value: f64) {
        self.values.entry(key.clone()).or_insert(self.default)[action] = value;
    }

    pub fn insert_values(&mut self, key: K, values: ActionValues) {
        self.values.insert(key, values);
    }

    pub fn max_value(&self, key: &K) -> f64 {
        let values = self.get_values(key);
        values.iter().skip(1).fold(values[0], |acc, x| acc.max(*x))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &ActionValues)> {
        self.values.iter()
    }

    pub fn reset(&mut self) {
        self.values = FxHashMap::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_keys_read_as_default_without_inserting() {
        let table: TabularPolicy<u32> = TabularPolicy::default();
        assert_eq!(table.get_values(&7), [0.0; Action::COUNT]);
        assert_eq!(table.max_value(&7), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn first_write_materializes_row() {
        let mut table: TabularPolicy<u32> = TabularPolicy::new(0.0);
        table.set(&1, Action::EAST, -0.7);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&1, Action::EAST), -0.7);
        assert_eq!(table.get(&1, Action::NORTH), 0.0);
    }

    #[test]
    fn max_handles_all_negative_rows() {
        let mut table: TabularPolicy<u32> = TabularPolicy::new(0.0);
        table.insert_values(0, [-3.0, -1.5, -2.0, -9.0]);
        assert_eq!(table.max_value(&0), -1.5);
    }

    #[test]
    fn reset_drops_everything() {
        let mut table: TabularPolicy<u32> = TabularPolicy::new(0.0);
        table.set(&1, Action::WEST, 4.0);
        table.reset();
        assert!(table.is_empty());
        assert_eq!(table.get(&1, Action::WEST), 0.0);
    }
}
