use crate::{
    error::{Result, SchemaError},
    sql::parser::ast::Filter,
};

use super::{
    executor::{Executor, ResultSet},
    parser::Parser,
    schema::Table,
    types::Row,
};

mod rowstore;

pub use rowstore::RowStore;

/// SQL engine trait (table-level operations)
///
/// There are no transactions: every call stands alone and writes are
/// visible as soon as they return.
pub trait Engine {
    fn get_table(&self, table_name: &str) -> Result<Option<Table>>;
    /// Returns table info, returns error if table doesn't exist
    fn must_get_table(&self, table_name: &str) -> Result<Table> {
        self.get_table(table_name)?
            .ok_or_else(|| SchemaError::TableNotFound(table_name.to_string()).into())
    }

    /// Writes `row` as the unit addressed by `identity`
    fn create_row(&mut self, identity: &str, row: &Row) -> Result<()>;
    /// Reads every row of a table, projected onto `columns`
    ///
    /// `filters` are accepted but not evaluated.
    fn scan_table(
        &mut self,
        table_name: &str,
        columns: &[String],
        filters: &[Filter],
    ) -> Result<Vec<Row>>;
}

/// SQL session for executing statements
pub struct Session<E: Engine> {
    engine: E,
}

impl<E: Engine + 'static> Session<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Executes a SQL statement
    pub fn execute(&mut self, sql: &str) -> Result<ResultSet> {
        let stmt = Parser::new(sql).parse()?;
        <dyn Executor<E>>::build(stmt).execute(&mut self.engine)
    }

    pub fn engine(&mut self) -> &mut E {
        &mut self.engine
    }
}
