use tracing::{debug, warn};

use crate::{
    config::ROW_UNIT_MAX_SIZE,
    error::{Result, StorageError},
    sql::{
        parser::ast::Filter,
        schema::{Database, Table},
        types::{Field, Row},
    },
    storage::engine::Engine as StorageEngine,
};

use super::Engine;

/// Row-unit backed SQL engine
///
/// Each row is serialized on its own and stored under the table's namespace,
/// keyed by the row identity. SELECT reads every unit of the table.
pub struct RowStore<E: StorageEngine> {
    schema: Database,
    storage: E,
    max_row_size: usize,
}

impl<E: StorageEngine> RowStore<E> {
    pub fn new(schema: Database, storage: E) -> Self {
        Self {
            schema,
            storage,
            max_row_size: ROW_UNIT_MAX_SIZE,
        }
    }

    /// Lowers the row-unit size limit; values above the hard cap are clamped
    pub fn with_max_row_size(mut self, size: usize) -> Self {
        self.max_row_size = size.min(ROW_UNIT_MAX_SIZE);
        self
    }

    pub fn schema(&self) -> &Database {
        &self.schema
    }

    pub fn storage(&mut self) -> &mut E {
        &mut self.storage
    }
}

impl<E: StorageEngine> Engine for RowStore<E> {
    fn get_table(&self, table_name: &str) -> Result<Option<Table>> {
        Ok(self.schema.table(table_name).cloned())
    }

    fn create_row(&mut self, identity: &str, row: &Row) -> Result<()> {
        let value = bincode::serialize(row)?;
        if value.len() > self.max_row_size {
            return Err(StorageError::DataTooBig {
                size: value.len(),
                limit: self.max_row_size,
            }
            .into());
        }

        debug!(table = %row.table_name, identity, size = value.len(), "write row");
        self.storage.set(&row.table_name, identity, value)
    }

    fn scan_table(
        &mut self,
        table_name: &str,
        columns: &[String],
        filters: &[Filter],
    ) -> Result<Vec<Row>> {
        if !filters.is_empty() {
            warn!(table = table_name, count = filters.len(), "row filters are not evaluated");
        }

        let mut rows = Vec::new();
        for (key, unit) in self.storage.scan(table_name)? {
            let data = match unit {
                Ok(data) => data,
                Err(err) => {
                    warn!(table = table_name, key = %key, error = %err, "read row failed");
                    continue;
                }
            };
            let row: Row = match bincode::deserialize(&data) {
                Ok(row) => row,
                Err(err) => {
                    warn!(table = table_name, key = %key, error = %err, "decode row failed");
                    continue;
                }
            };

            // Project in the requested order; partial rows are dropped, not padded
            let fields: Vec<Field> = columns
                .iter()
                .filter_map(|name| row.field(name).cloned())
                .collect();
            if fields.len() != columns.len() {
                warn!(
                    table = table_name,
                    key = %key,
                    found = fields.len(),
                    requested = columns.len(),
                    "invalid result column length"
                );
                continue;
            }

            rows.push(Row { fields, ..row });
        }

        debug!(table = table_name, rows = rows.len(), "scan table");
        Ok(rows)
    }
}
