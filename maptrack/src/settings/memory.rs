//! In-memory settings store.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::SettingsStore;

/// Volatile settings store backed by a hash map.
///
/// Used in tests and anywhere persistence is not wanted.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettingsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    fn contains(&self, key: &str) -> bool {
        self.values.lock().contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get_string("k"), None);
        assert!(!store.contains("k"));

        store.set_string("k", "v");
        assert_eq!(store.get_string("k").as_deref(), Some("v"));
        assert!(store.contains("k"));
    }

    #[test]
    fn test_typed_defaults_over_string_plane() {
        let store = MemorySettingsStore::new();
        store.set_integer("n", 42);
        store.set_bool("b", true);

        assert_eq!(store.get_integer("n"), Some(42));
        assert_eq!(store.get_bool("b"), Some(true));
        assert_eq!(store.get_string("b").as_deref(), Some("true"));
        assert_eq!(store.get_integer("missing"), None);
    }
}
