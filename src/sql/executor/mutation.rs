use crate::{
    error::{Error, Result, SchemaError, ValueError},
    sql::{
        engine::Engine,
        executor::ResultSet,
        parser::ast::Fields,
        schema::Table,
        types::{DataType, Field, Row, Value, coercion, identifier},
    },
};

use super::Executor;

/// INSERT executor
pub struct Insert {
    table_name: String,
    fields: Fields,
    values: Vec<String>,
}

impl Insert {
    pub fn new(table_name: String, fields: Fields, values: Vec<String>) -> Box<Self> {
        Box::new(Self {
            table_name,
            fields,
            values,
        })
    }
}

/// Row identity: the supplied primary-key value, or a new identifier
///
/// A synthesized identity is appended to `fields` when the table has a
/// primary key the caller left out. Without a primary key the identity only
/// names the row unit.
fn resolve_identity(table: &Table, fields: &mut Vec<Field>) -> Result<String> {
    let Some(pk) = table.primary_key() else {
        return Ok(identifier::new_identifier());
    };

    if let Some(field) = fields.iter().find(|f| f.name == pk.column_name) {
        return match field.get() {
            Some(value) => Ok(value.canonical()),
            None => Err(ValueError::ColumnNotNullable(pk.column_name.clone()).into()),
        };
    }

    let column = table
        .column(&pk.column_name)
        .ok_or_else(|| SchemaError::ColumnNotFound(pk.column_name.clone()))?;
    let identity = identifier::new_identifier();
    let value = match column.datatype {
        DataType::Uuid => Value::Uuid(identifier::parse_identifier(&identity)?),
        DataType::String => Value::String(identity.clone()),
        dt => return Err(ValueError::TypeMismatch(dt).into()),
    };
    fields.push(Field::new(column, value));
    Ok(identity)
}

impl<T: Engine> Executor<T> for Insert {
    fn execute(self: Box<Self>, engine: &mut T) -> Result<ResultSet> {
        let table = engine.must_get_table(&self.table_name)?;
        let names = self.fields.resolve(&table);

        let mut fields = coercion::coerce_fields(&names, &self.values, &table)?;
        let identity = resolve_identity(&table, &mut fields)?;

        let row = Row::new(table.name.clone(), fields);
        engine.create_row(&identity, &row)?;
        Ok(ResultSet::Insert { identity })
    }
}

/// UPDATE executor, not implemented
pub struct Update;

impl<T: Engine> Executor<T> for Update {
    fn execute(self: Box<Self>, _engine: &mut T) -> Result<ResultSet> {
        Err(Error::Unimplemented("UPDATE".into()))
    }
}

/// DELETE executor, not implemented
pub struct Delete;

impl<T: Engine> Executor<T> for Delete {
    fn execute(self: Box<Self>, _engine: &mut T) -> Result<ResultSet> {
        Err(Error::Unimplemented("DELETE".into()))
    }
}
