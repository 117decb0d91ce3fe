//! In-memory backend
//!
//! Keeps the last saved document in memory. Useful for embedding the engine
//! without a filesystem and for exercising failure handling in tests.

use std::cell::{Cell, RefCell};

use crate::error::{ForecastError, ForecastResult};

use super::store::StoreDocument;
use super::StateStore;

/// Persistence backend that never touches the filesystem
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RefCell<Option<StoreDocument>>,
    fail_saves: Cell<bool>,
    save_count: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document
    pub fn with_document(document: StoreDocument) -> Self {
        Self {
            document: RefCell::new(Some(document)),
            ..Self::default()
        }
    }

    /// Make every subsequent save fail
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Last successfully saved document
    pub fn saved(&self) -> Option<StoreDocument> {
        self.document.borrow().clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> ForecastResult<Option<StoreDocument>> {
        Ok(self.document.borrow().clone())
    }

    fn save(&self, document: &StoreDocument) -> ForecastResult<()> {
        if self.fail_saves.get() {
            return Err(ForecastError::Storage("storage quota exceeded".into()));
        }
        *self.document.borrow_mut() = Some(document.clone());
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}

impl<T: StateStore + ?Sized> StateStore for std::rc::Rc<T> {
    fn load(&self) -> ForecastResult<Option<StoreDocument>> {
        (**self).load()
    }

    fn save(&self, document: &StoreDocument) -> ForecastResult<()> {
        (**self).save(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&StoreDocument::default()).unwrap();
        assert_eq!(store.load().unwrap(), Some(StoreDocument::default()));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_failing_save_keeps_previous_document() {
        let store = MemoryStore::with_document(StoreDocument::default());
        store.set_fail_saves(true);

        assert!(store.save(&StoreDocument::default()).is_err());
        assert_eq!(store.save_count(), 0);
        assert!(store.saved().is_some());
    }
}
