use crate::error::{Result, StorageError};

/// Abstract storage engine interface (byte-level operations)
///
/// Units are addressed by a namespace (one per table) and a key inside it.
/// Different from sql::engine::Engine which operates on tables and rows.
pub trait Engine {
    /// Writes a unit, creating the namespace on first use. Last write wins.
    fn set(&mut self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()>;
    fn get(&mut self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>>;
    /// Keys of the namespace in the engine's listing order
    ///
    /// A namespace that was never written is empty, not an error.
    fn keys(&mut self, namespace: &str) -> Result<Vec<String>>;

    /// Reads every unit of a namespace, each read failing on its own
    fn scan(&mut self, namespace: &str) -> Result<Vec<(String, Result<Vec<u8>>)>> {
        let keys = self.keys(namespace)?;
        Ok(keys
            .into_iter()
            .filter_map(|key| match self.get(namespace, &key) {
                Ok(Some(value)) => Some((key, Ok(value))),
                // removed between listing and reading
                Ok(None) => None,
                Err(err) => Some((key, Err(err))),
            })
            .collect())
    }
}

/// Rejects names that cannot address a single unit
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(StorageError::InvalidKey(name.to_string()).into());
    }
    Ok(())
}
