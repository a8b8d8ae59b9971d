//! Engine configuration
//!
//! Tells the engine where its schema and row units live, and how large a
//! single row unit may grow.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hard upper bound for one serialized row unit
pub const ROW_UNIT_MAX_SIZE: usize = 8192;

/// Default name of the schema file inside the data directory
pub const DEFAULT_SCHEMA_FILE: &str = "schema";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory; holds the schema file and one directory per table
    pub data_dir: PathBuf,
    pub schema_file: String,
    /// Size limit for a serialized row, never above `ROW_UNIT_MAX_SIZE`
    pub max_row_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            schema_file: DEFAULT_SCHEMA_FILE.to_string(),
            max_row_size: ROW_UNIT_MAX_SIZE,
        }
    }
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_schema_file(mut self, name: impl Into<String>) -> Self {
        self.schema_file = name.into();
        self
    }

    pub fn with_max_row_size(mut self, size: usize) -> Self {
        self.max_row_size = size;
        self
    }

    /// Full path of the schema file
    pub fn schema_path(&self) -> PathBuf {
        self.data_dir.join(&self.schema_file)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_file.is_empty() {
            return Err(Error::Internal("schema file name is empty".into()));
        }
        if self.max_row_size == 0 || self.max_row_size > ROW_UNIT_MAX_SIZE {
            return Err(Error::Internal(format!(
                "max row size {} outside 1..={}",
                self.max_row_size, ROW_UNIT_MAX_SIZE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ROW_UNIT_MAX_SIZE};
    use crate::error::Result;

    #[test]
    fn test_config_defaults() -> Result<()> {
        let cfg = Config::new("/tmp/db");
        cfg.validate()?;
        assert_eq!(cfg.max_row_size, ROW_UNIT_MAX_SIZE);
        assert_eq!(cfg.schema_path(), std::path::PathBuf::from("/tmp/db/schema"));
        Ok(())
    }

    #[test]
    fn test_config_limits() {
        assert!(Config::default().with_max_row_size(0).validate().is_err());
        assert!(Config::default().with_max_row_size(ROW_UNIT_MAX_SIZE + 1).validate().is_err());
        assert!(Config::default().with_max_row_size(1024).validate().is_ok());
        assert!(Config::default().with_schema_file("").validate().is_err());
    }
}
