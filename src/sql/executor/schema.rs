use tracing::debug;

use crate::{
    error::{Error, Result},
    sql::{
        engine::Engine,
        executor::{Executor, ResultSet},
        parser::ast::CreateTableStatement,
    },
};

/// CREATE TABLE executor
///
/// The grammar is accepted so that callers get a clear error, but table
/// creation is not implemented.
pub struct CreateTable {
    stmt: CreateTableStatement,
}

impl CreateTable {
    pub fn new(stmt: CreateTableStatement) -> Box<Self> {
        Box::new(Self { stmt })
    }
}

impl<T: Engine> Executor<T> for CreateTable {
    fn execute(self: Box<Self>, _engine: &mut T) -> Result<ResultSet> {
        debug!(
            table = %self.stmt.table_name,
            columns = self.stmt.columns.len(),
            "create table requested"
        );
        Err(Error::Unimplemented("CREATE TABLE".into()))
    }
}
