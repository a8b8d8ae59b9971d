use crate::{
    error::Result,
    sql::{
        engine::Engine,
        executor::{
            mutation::Insert,
            query::Scan,
            schema::CreateTable,
        },
        parser::ast::Statement,
        types::Row,
    },
};

mod mutation;
mod query;
mod schema;

pub use mutation::{Delete, Update};

/// SQL executor trait
pub trait Executor<T: Engine> {
    fn execute(self: Box<Self>, engine: &mut T) -> Result<ResultSet>;
}

/// Builds an executor from a parsed statement
impl<T: Engine + 'static> dyn Executor<T> {
    pub fn build(stmt: Statement) -> Box<dyn Executor<T>> {
        match stmt {
            Statement::CreateTable(stmt) => CreateTable::new(stmt),
            Statement::Insert(stmt) => Insert::new(stmt.table_name, stmt.fields, stmt.values),
            Statement::Select(stmt) => Scan::new(stmt.table_name, stmt.fields, Vec::new()),
        }
    }
}

/// Execution result set
#[derive(Debug, PartialEq)]
pub enum ResultSet {
    /// One row written, addressed by `identity`
    Insert { identity: String },
    Scan { columns: Vec<String>, rows: Vec<Row> },
}
