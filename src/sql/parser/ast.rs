use crate::sql::schema::Table;

/// Abstract Syntax Tree (AST) node definitions for SQL statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// CREATE TABLE statement, recognized but not executable
    CreateTable(CreateTableStatement),
    /// INSERT statement
    Insert(InsertStatement),
    /// SELECT statement
    Select(SelectStatement),
}

/// Column list of a statement
#[derive(Debug, Clone, PartialEq)]
pub enum Fields {
    /// No list given (`*`, or INSERT without columns): every schema column
    All,
    Named(Vec<String>),
}

impl Fields {
    /// Column names to use against `table`, schema order for `All`
    pub fn resolve(&self, table: &Table) -> Vec<String> {
        match self {
            Fields::All => table.column_names(),
            Fields::Named(names) => names.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table_name: String,
    pub fields: Fields,
    /// Literal text of each value, unquoted and unescaped
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub table_name: String,
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub table_name: String,
    pub columns: Vec<ColumnSpec>,
}

/// Column definition for CREATE TABLE statements
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    /// Type name as written
    pub type_name: String,
}

/// Comparison operator of a row filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// A row filter predicate: `column <operator> value`
///
/// Scans accept filters but do not evaluate them yet; there is no WHERE.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}
