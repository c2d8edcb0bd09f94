//! Entity store port - keyed records with prefix range scans
//!
//! Entities persist as JSON documents under their composite keys. The
//! port guarantees read-your-writes inside one operation; durability and
//! atomic commit of the whole write set belong to the hosting ledger.

use covenant_common::Result;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

pub trait EntityStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    fn put_raw(&self, key: &str, value: String) -> Result<()>;

    /// All records whose key starts with `prefix`, in key order.
    fn query_by_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>>;

    /// Load and deserialize one entity.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store one entity.
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        self.put_raw(key, serde_json::to_string(value)?)
    }

    /// Load every entity under a key prefix, in key order.
    fn load_prefix<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>>
    where
        Self: Sized,
    {
        self.query_by_prefix(prefix)?
            .into_iter()
            .map(|(_, raw)| serde_json::from_str(&raw).map_err(Into::into))
            .collect()
    }
}

/// In-memory entity store. BTreeMap keeps keys ordered, so prefix scans
/// are contiguous ranges.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<BTreeMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for InMemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: String) -> Result<()> {
        self.records.write().insert(key.to_string(), value);
        Ok(())
    }

    fn query_by_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let records = self.records.read();
        Ok(records
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
