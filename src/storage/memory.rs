//! In-memory storage, used by tests and dry runs

use crate::storage::traits::{DatasetSink, KeyValueStore, StorageError, StorageResult};
use crate::storage::Record;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<Vec<Record>>,
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Database("memory store lock poisoned".to_string())
}

impl DatasetSink for MemoryStore {
    fn push_data(&self, record: Record) -> StorageResult<()> {
        self.items.lock().map_err(poisoned)?.push(record);
        Ok(())
    }

    fn dataset_items(&self) -> StorageResult<Vec<Record>> {
        Ok(self.items.lock().map_err(poisoned)?.clone())
    }
}

impl KeyValueStore for MemoryStore {
    fn set_value(&self, key: &str, value: &Value) -> StorageResult<()> {
        self.values
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn get_value(&self, key: &str) -> StorageResult<Option<Value>> {
        Ok(self.values.lock().map_err(poisoned)?.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_preserves_order() {
        let store = MemoryStore::new();
        for i in 0..3 {
            let mut record = Record::new();
            record.insert("n".to_string(), json!(i));
            store.push_data(record).unwrap();
        }

        let items = store.dataset_items().unwrap();
        let ns: Vec<_> = items.iter().map(|r| r["n"].clone()).collect();
        assert_eq!(ns, vec![json!(0), json!(1), json!(2)]);
    }

    #[test]
    fn test_set_value_replaces() {
        let store = MemoryStore::new();
        store.set_value("k", &json!(1)).unwrap();
        store.set_value("k", &json!(2)).unwrap();
        assert_eq!(store.get_value("k").unwrap(), Some(json!(2)));
        assert_eq!(store.get_value("missing").unwrap(), None);
    }
}
