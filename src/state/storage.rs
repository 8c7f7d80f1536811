use std::collections::HashMap;

/// String key-value storage the annotator persists into.
///
/// On the web, eframe backs this with browser local storage; natively it is a
/// RON file in the app's data directory.
pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> Option<String>;

    /// Overwrite `key` with `value`.
    fn set_string(&mut self, key: &str, value: String);

    fn flush(&mut self) {}
}

impl<'a> KeyValueStore for dyn eframe::Storage + 'a {
    fn get_string(&self, key: &str) -> Option<String> {
        eframe::Storage::get_string(self, key)
    }

    fn set_string(&mut self, key: &str, value: String) {
        eframe::Storage::set_string(self, key, value);
    }

    fn flush(&mut self) {
        eframe::Storage::flush(self);
    }
}

/// In-memory store, used when eframe offers no persistence and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}
