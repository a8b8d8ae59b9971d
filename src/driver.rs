//! Client-facing driver surface
//!
//! A `Connection` classifies statement text by its leading keyword and runs
//! it against a `RowStore`. Results come back as `Rows`. Capabilities the
//! engine lacks (transactions, UPDATE, DELETE) answer with
//! `Error::Unimplemented` instead of succeeding.
//!
//! Drivers are made available by name with an explicit `register` call at
//! startup; nothing is registered implicitly.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::{Arc, Mutex, OnceLock},
};

use tracing::{debug, info};

use crate::{
    config::Config,
    error::{Error, Result},
    sql::{
        engine::{RowStore, Session},
        executor::{Delete, Executor, ResultSet, Update},
        schema::Database,
        types::{Field, Row},
    },
    storage::{disk::DiskEngine, engine::Engine as StorageEngine},
};

/// Statement class, decided by the leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Insert,
    Select,
    Update,
    Delete,
    Create,
}

impl StatementKind {
    /// Classifies statement text by its leading keyword (case-insensitive)
    pub fn classify(sql: &str) -> Option<StatementKind> {
        let word: String = sql
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        Some(match word.to_uppercase().as_ref() {
            "INSERT" => StatementKind::Insert,
            "SELECT" => StatementKind::Select,
            "UPDATE" => StatementKind::Update,
            "DELETE" => StatementKind::Delete,
            "CREATE" => StatementKind::Create,
            _ => return None,
        })
    }
}

/// Cursor over a statement's result
pub trait Rows {
    /// Result column names, in output order
    fn columns(&self) -> &[String];
    /// Advances to the next row; `None` once exhausted or closed
    fn next(&mut self) -> Result<Option<Vec<Field>>>;
    fn close(&mut self) -> Result<()>;
}

/// Transaction hooks
pub trait Tx {
    fn commit(&mut self) -> Result<()>;
    fn rollback(&mut self) -> Result<()>;
}

/// Result of `Connection::query`
#[derive(Debug)]
pub struct QueryRows {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Row>,
    last_insert_id: Option<String>,
    closed: bool,
}

impl QueryRows {
    fn from_result(result: ResultSet) -> Self {
        match result {
            ResultSet::Insert { identity } => Self {
                columns: Vec::new(),
                rows: Vec::new().into_iter(),
                last_insert_id: Some(identity),
                closed: false,
            },
            ResultSet::Scan { columns, rows } => Self {
                columns,
                rows: rows.into_iter(),
                last_insert_id: None,
                closed: false,
            },
        }
    }

    /// Identity of the row written by an INSERT
    pub fn last_insert_id(&self) -> Option<&str> {
        self.last_insert_id.as_deref()
    }
}

impl Rows for QueryRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next(&mut self) -> Result<Option<Vec<Field>>> {
        if self.closed {
            return Ok(None);
        }
        Ok(self.rows.next().map(|row| row.fields))
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// A connection to one database
pub struct Connection<E: StorageEngine + 'static = DiskEngine> {
    session: Session<RowStore<E>>,
}

impl Connection<DiskEngine> {
    /// Loads the schema under `config` and stores rows beside it
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let schema = Database::load(config)?;
        info!(schema = %schema.name, dir = %config.data_dir().display(), "open database");
        let store = RowStore::new(schema, DiskEngine::new(config.data_dir()))
            .with_max_row_size(config.max_row_size);
        Ok(Self::new(store))
    }
}

impl<E: StorageEngine + 'static> Connection<E> {
    pub fn new(store: RowStore<E>) -> Self {
        Self {
            session: Session::new(store),
        }
    }

    /// Runs one statement
    pub fn query(&mut self, sql: &str) -> Result<QueryRows> {
        let kind = StatementKind::classify(sql)
            .ok_or_else(|| Error::parse("INSERT, SELECT, UPDATE, DELETE or CREATE", sql.trim()))?;
        debug!(?kind, "query");

        let result = match kind {
            StatementKind::Insert | StatementKind::Select | StatementKind::Create => {
                self.session.execute(sql)?
            }
            StatementKind::Update => Box::new(Update).execute(self.session.engine())?,
            StatementKind::Delete => Box::new(Delete).execute(self.session.engine())?,
        };
        Ok(QueryRows::from_result(result))
    }

    pub fn begin(&mut self) -> Result<&mut dyn Tx> {
        Err(Error::Unimplemented("BEGIN".into()))
    }

    pub fn prepare(&mut self, _sql: &str) -> Result<()> {
        Err(Error::Unimplemented("PREPARE".into()))
    }

    pub fn close(self) -> Result<()> {
        Ok(())
    }

    pub fn schema(&mut self) -> &Database {
        self.session.engine().schema()
    }
}

impl<E: StorageEngine + 'static> Tx for Connection<E> {
    fn commit(&mut self) -> Result<()> {
        Err(Error::Unimplemented("COMMIT".into()))
    }

    fn rollback(&mut self) -> Result<()> {
        Err(Error::Unimplemented("ROLLBACK".into()))
    }
}

/// Opens connections to databases in a data directory
pub trait Driver: Send + Sync {
    fn open(&self, data_dir: &Path) -> Result<Connection>;
}

/// Driver over the filesystem layout of `Connection::open`
#[derive(Debug, Default, Clone)]
pub struct FileDriver {
    config: Config,
}

impl FileDriver {
    /// `config.data_dir` is replaced by the directory passed to `open`
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Driver for FileDriver {
    fn open(&self, data_dir: &Path) -> Result<Connection> {
        let mut config = self.config.clone();
        config.data_dir = data_dir.to_path_buf();
        Connection::open(&config)
    }
}

fn registry() -> &'static Mutex<BTreeMap<String, Arc<dyn Driver>>> {
    static DRIVERS: OnceLock<Mutex<BTreeMap<String, Arc<dyn Driver>>>> = OnceLock::new();
    DRIVERS.get_or_init(|| Mutex::new(BTreeMap::new()))
}

/// Makes `driver` available under `name`; each name registers once
pub fn register(name: &str, driver: impl Driver + 'static) -> Result<()> {
    let mut drivers = registry().lock()?;
    if drivers.contains_key(name) {
        return Err(Error::Internal(format!("driver {} already registered", name)));
    }
    drivers.insert(name.to_string(), Arc::new(driver));
    info!(name, "driver registered");
    Ok(())
}

/// Registered driver names, sorted
pub fn drivers() -> Result<Vec<String>> {
    Ok(registry().lock()?.keys().cloned().collect())
}

/// Opens `data_dir` with the driver registered as `name`
pub fn open(name: &str, data_dir: impl AsRef<Path>) -> Result<Connection> {
    let driver = registry()
        .lock()?
        .get(name)
        .cloned()
        .ok_or_else(|| Error::Internal(format!("unknown driver {}", name)))?;
    driver.open(data_dir.as_ref())
}

#[cfg(test)]
mod tests {
    use super::{Connection, FileDriver, Rows, StatementKind, Tx};
    use crate::{
        config::Config,
        error::{Error, Result, StorageError},
        sql::{
            engine::RowStore,
            schema::{Column, Constraint, Database, Table},
            types::{DataType, Value},
        },
        storage::memory::MemoryEngine,
    };

    fn connection() -> Connection<MemoryEngine> {
        let mut db = Database::create("test");
        db.tables.push(Table {
            name: "users".into(),
            columns: vec![
                Column::new("id", DataType::Uuid),
                Column::new("email", DataType::String),
            ],
            constraints: vec![Constraint::new("pk", "id").primary_key()],
        });
        Connection::new(RowStore::new(db, MemoryEngine::new()))
    }

    #[test]
    fn test_classify() {
        assert_eq!(StatementKind::classify("  insert into t"), Some(StatementKind::Insert));
        assert_eq!(StatementKind::classify("Select *"), Some(StatementKind::Select));
        assert_eq!(StatementKind::classify("UPDATE t SET"), Some(StatementKind::Update));
        assert_eq!(StatementKind::classify("delete from t"), Some(StatementKind::Delete));
        assert_eq!(StatementKind::classify("create table"), Some(StatementKind::Create));
        assert_eq!(StatementKind::classify("SELECTED"), None);
        assert_eq!(StatementKind::classify("drop table t"), None);
        assert_eq!(StatementKind::classify(""), None);
    }

    #[test]
    fn test_query_rows() -> Result<()> {
        let mut conn = connection();
        let inserted = conn.query("INSERT INTO users (email) VALUES ('a@b.com');")?;
        let id = inserted.last_insert_id().map(str::to_string);
        assert!(id.is_some());

        let mut rows = conn.query("select * from users;")?;
        assert_eq!(rows.columns(), ["id", "email"]);
        let row = rows.next()?.expect("one row");
        assert_eq!(Some(row[0].value.canonical()), id);
        assert_eq!(rows.next()?, None);
        rows.close()?;
        assert_eq!(rows.next()?, None);
        Ok(())
    }

    #[test]
    fn test_unimplemented_capabilities() {
        let mut conn = connection();
        for (sql, what) in [
            ("UPDATE users SET email = 'x';", "UPDATE"),
            ("delete from users;", "DELETE"),
            ("CREATE TABLE t (a int);", "CREATE TABLE"),
        ] {
            assert_eq!(conn.query(sql).err(), Some(Error::Unimplemented(what.into())));
        }
        assert_eq!(conn.begin().err(), Some(Error::Unimplemented("BEGIN".into())));
        assert_eq!(conn.commit(), Err(Error::Unimplemented("COMMIT".into())));
        assert_eq!(conn.rollback(), Err(Error::Unimplemented("ROLLBACK".into())));
        assert_eq!(
            conn.prepare("select * from users;"),
            Err(Error::Unimplemented("PREPARE".into()))
        );
        assert!(conn.close().is_ok());
    }

    #[test]
    fn test_unsupported_and_malformed() {
        let mut conn = connection();
        assert!(matches!(conn.query("DROP TABLE users;"), Err(Error::Parse { .. })));
        assert!(matches!(conn.query("CREATE TABLE t (a);"), Err(Error::Parse { .. })));
        assert!(matches!(conn.query("select * from users"), Err(Error::Parse { .. })));
    }

    fn users_schema() -> Database {
        let mut db = Database::create("app");
        db.tables.push(Table {
            name: "users".into(),
            columns: vec![
                Column::new("id", DataType::Uuid),
                Column::new("email", DataType::String),
                Column::new("password", DataType::String),
            ],
            constraints: vec![Constraint::new("pk_users", "id").primary_key()],
        });
        db
    }

    #[test]
    fn test_file_driver_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::new(dir.path()).with_max_row_size(256);
        users_schema().save(&config)?;

        super::register("test-round-trip", FileDriver::new(config))?;
        assert!(super::drivers()?.contains(&"test-round-trip".to_string()));
        assert!(super::register("test-round-trip", FileDriver::default()).is_err());

        let mut conn = super::open("test-round-trip", dir.path())?;
        let mut empty = conn.query("SELECT * FROM users;")?;
        assert_eq!(empty.next()?, None);

        let inserted = conn.query("INSERT INTO users (email, password) VALUES ('a@b.com', 'pw');")?;
        let id = inserted.last_insert_id().map(str::to_string).expect("identity");
        assert!(dir.path().join("users").join(&id).is_file());

        let big = "x".repeat(300);
        let oversize = format!("INSERT INTO users (email, password) VALUES ('{}', 'pw');", big);
        assert!(matches!(
            conn.query(&oversize),
            Err(Error::Storage(StorageError::DataTooBig { .. }))
        ));
        conn.close()?;

        // a fresh connection sees what the first one wrote
        let mut conn = super::open("test-round-trip", dir.path())?;
        let mut rows = conn.query("SELECT (id, email, password) FROM users;")?;
        assert_eq!(rows.columns(), ["id", "email", "password"]);
        let row = rows.next()?.expect("one row");
        assert_eq!(row[0].value.canonical(), id);
        assert_eq!(row[1].value, Value::String("a@b.com".into()));
        assert_eq!(row[2].value, Value::String("pw".into()));
        assert_eq!(rows.next()?, None);
        Ok(())
    }

    #[test]
    fn test_open_unknown_driver() {
        assert!(matches!(
            super::open("test-not-registered", "."),
            Err(Error::Internal(_))
        ));
    }
}
