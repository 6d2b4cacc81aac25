//! In-memory snapshot store
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::SnapshotStore;

/// Store that keeps snapshots in a shared map. Clones see the same data, so a
/// test can hold one handle while the app owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw snapshot stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    /// Overwrite `key` with arbitrary text, bypassing serialization.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) {
        self.slots.borrow_mut().insert(key.to_string(), value.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    type Error = Infallible;

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.put_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_slots() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.save("a", "1").unwrap();
        assert_eq!(handle.load("a").unwrap().as_deref(), Some("1"));
        handle.remove("a").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.load("missing").unwrap(), None);
    }
}
