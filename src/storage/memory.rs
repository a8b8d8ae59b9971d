use std::collections::BTreeMap;

use crate::{
    error::Result,
    storage::engine::{Engine, validate_name},
};

/// In-memory storage engine
pub struct MemoryEngine {
    data: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Implements storage Engine trait (byte-level operations)
impl Engine for MemoryEngine {
    fn set(&mut self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()> {
        validate_name(namespace)?;
        validate_name(key)?;
        self.data
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn get(&mut self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .data
            .get(namespace)
            .and_then(|units| units.get(key))
            .cloned())
    }

    fn keys(&mut self, namespace: &str) -> Result<Vec<String>> {
        Ok(self
            .data
            .get(namespace)
            .map(|units| units.keys().cloned().collect())
            .unwrap_or_default())
    }
}
