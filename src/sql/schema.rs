use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::Config,
    error::{Error, Result, SchemaError, StorageError},
    sql::types::{DataType, Value},
};

/// Schema format version, bumped on incompatible schema changes
pub const VERSION_MAJOR: u32 = 0;
/// Bumped on fixes that keep the schema format
pub const VERSION_MINOR: u32 = 1;

/// Schema of an entire database, persisted as one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    pub tables: Vec<Table>,
    pub version_major: u32,
    pub version_minor: u32,
}

impl Database {
    /// Creates a new blank database schema
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
        }
    }

    /// Loads and validates the schema stored under `config`
    pub fn load(config: &Config) -> Result<Self> {
        let path = config.schema_path();
        let data = fs::read(&path)
            .map_err(|e| StorageError::Read(format!("{}: {}", path.display(), e)))?;
        let db: Database = bincode::deserialize(&data)?;
        for table in &db.tables {
            table.validate()?;
        }
        Ok(db)
    }

    /// Writes the schema under `config`, returns the written size
    pub fn save(&self, config: &Config) -> Result<usize> {
        for table in &self.tables {
            table.validate()?;
        }
        let data = bincode::serialize(self)?;
        write_file(&config.schema_path(), &data)?;
        info!(schema = %self.name, size = data.len(), "schema saved");
        Ok(data.len())
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Returns the table, or a table-not-found error
    pub fn must_table(&self, name: &str) -> Result<&Table> {
        self.table(name)
            .ok_or_else(|| SchemaError::TableNotFound(name.to_string()).into())
    }
}

/// Writes `data` to `path`, creating the parent directory on demand
pub(crate) fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| StorageError::Write(format!("{}: {}", dir.display(), e)))?;
    }
    fs::write(path, data).map_err(|e| StorageError::Write(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

/// Table schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
}

impl Table {
    /// Validates table schema
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Error {
            SchemaError::InvalidTable {
                table: self.name.clone(),
                reason,
            }
            .into()
        };

        if self.columns.is_empty() {
            return Err(invalid("no columns".into()));
        }

        let mut names = HashSet::new();
        for col in &self.columns {
            if !names.insert(col.name.as_str()) {
                return Err(invalid(format!("duplicate column {}", col.name)));
            }
        }

        for constraint in &self.constraints {
            if !names.contains(constraint.column_name.as_str()) {
                return Err(invalid(format!(
                    "constraint {} references unknown column {}",
                    constraint.name, constraint.column_name
                )));
            }
        }

        if self.constraints.iter().filter(|c| c.primary_key).count() > 1 {
            return Err(invalid("multiple primary keys".into()));
        }

        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Constraint entry for a column, if the table declares one
    pub fn constraint(&self, column_name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.column_name == column_name)
    }

    pub fn primary_key(&self) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.primary_key)
    }

    /// All column names in schema order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Column schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub datatype: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, datatype: DataType) -> Self {
        Self {
            name: name.into(),
            datatype,
        }
    }
}

/// Constraint attached to one column
///
/// Stored with the schema. Uniqueness, primary and foreign keys are not
/// checked when rows are written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub column_name: String,
    pub primary_key: bool,
    pub unique: bool,
    pub not_null: bool,
    /// Referenced (table, column) for a foreign key
    pub foreign_key: Option<(String, String)>,
    pub default: Option<DefaultValue>,
}

impl Constraint {
    pub fn new(name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_name: column_name.into(),
            ..Default::default()
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self.unique = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some((table.into(), column.into()));
        self
    }

    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Default value specification of a constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    Literal(Value),
    /// Fresh random identifier
    NewIdentifier,
    CurrentTime,
}

#[cfg(test)]
mod tests {
    use super::{Column, Constraint, Database, DefaultValue, Table};
    use crate::{
        config::Config,
        error::{Error, Result, SchemaError, StorageError},
        sql::types::DataType,
    };

    fn users() -> Table {
        Table {
            name: "users".into(),
            columns: vec![
                Column::new("id", DataType::Uuid),
                Column::new("email", DataType::String),
                Column::new("created", DataType::Time),
            ],
            constraints: vec![
                Constraint::new("pk_users", "id")
                    .primary_key()
                    .default_value(DefaultValue::NewIdentifier),
                Constraint::new("uq_email", "email").unique(),
                Constraint::new("df_created", "created").default_value(DefaultValue::CurrentTime),
            ],
        }
    }

    #[test]
    fn test_validate() -> Result<()> {
        users().validate()?;

        let mut t = users();
        t.constraints.push(Constraint::new("fk", "missing").references("other", "id"));
        assert!(matches!(
            t.validate(),
            Err(Error::Schema(SchemaError::InvalidTable { .. }))
        ));

        let mut t = users();
        t.columns.push(Column::new("email", DataType::String));
        assert!(t.validate().is_err());

        let mut t = users();
        t.constraints.push(Constraint::new("pk2", "email").primary_key());
        assert!(t.validate().is_err());

        let t = Table {
            name: "empty".into(),
            columns: vec![],
            constraints: vec![],
        };
        assert!(t.validate().is_err());
        Ok(())
    }

    #[test]
    fn test_lookup() -> Result<()> {
        let mut db = Database::create("test");
        db.tables.push(users());
        let t = db.must_table("users")?;
        assert_eq!(t.primary_key().map(|c| c.column_name.as_str()), Some("id"));
        assert!(t.constraint("email").is_some());
        assert!(t.column("password").is_none());
        assert_eq!(t.column_names(), vec!["id", "email", "created"]);
        assert_eq!(
            db.must_table("nope"),
            Err(Error::Schema(SchemaError::TableNotFound("nope".into())))
        );
        Ok(())
    }

    #[test]
    fn test_save_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::new(dir.path().join("nested"));

        let mut db = Database::create("testme");
        db.tables.push(users());
        let size = db.save(&config)?;
        assert!(size > 0);

        let loaded = Database::load(&config)?;
        assert_eq!(loaded, db);
        assert_eq!(loaded.version_major, 0);
        assert_eq!(loaded.version_minor, 1);
        Ok(())
    }

    #[test]
    fn test_load_missing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(matches!(
            Database::load(&Config::new(dir.path())),
            Err(Error::Storage(StorageError::Read(_)))
        ));
        Ok(())
    }
}
