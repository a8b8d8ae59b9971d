use std::{fs, io::ErrorKind, path::PathBuf};

use tracing::warn;

use crate::{
    error::{Result, StorageError},
    storage::engine::{Engine, validate_name},
};

/// Filesystem storage engine
///
/// Every namespace is a directory under `root` and every unit a file in it.
/// Listing order is whatever the filesystem returns.
pub struct DiskEngine {
    root: PathBuf,
}

impl DiskEngine {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn unit_path(&self, namespace: &str, key: &str) -> Result<PathBuf> {
        validate_name(namespace)?;
        validate_name(key)?;
        Ok(self.root.join(namespace).join(key))
    }
}

impl Engine for DiskEngine {
    fn set(&mut self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()> {
        let path = self.unit_path(namespace, key)?;
        crate::sql::schema::write_file(&path, &value)
    }

    fn get(&mut self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.unit_path(namespace, key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(format!("{}: {}", path.display(), e)).into()),
        }
    }

    fn keys(&mut self, namespace: &str) -> Result<Vec<String>> {
        validate_name(namespace)?;
        let dir = self.root.join(namespace);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Read(format!("{}: {}", dir.display(), e)).into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::Read(format!("{}: {}", dir.display(), e)))?;
            if entry.path().is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => keys.push(name),
                Err(name) => {
                    warn!(namespace, name = ?name, "skip unit with non-UTF-8 name");
                }
            }
        }
        Ok(keys)
    }
}
