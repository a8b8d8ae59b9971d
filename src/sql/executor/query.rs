use crate::{
    error::{Result, SchemaError},
    sql::{
        engine::Engine,
        executor::ResultSet,
        parser::ast::{Fields, Filter},
    },
};

use super::Executor;

/// Table scan executor (SELECT)
///
/// Row order follows the storage listing and is unspecified.
pub struct Scan {
    table_name: String,
    fields: Fields,
    filters: Vec<Filter>,
}

impl Scan {
    pub fn new(table_name: String, fields: Fields, filters: Vec<Filter>) -> Box<Self> {
        Box::new(Self {
            table_name,
            fields,
            filters,
        })
    }
}

impl<T: Engine> Executor<T> for Scan {
    fn execute(self: Box<Self>, engine: &mut T) -> Result<ResultSet> {
        let table = engine.must_get_table(&self.table_name)?;
        let columns = self.fields.resolve(&table);
        if let Some(missing) = columns.iter().find(|c| table.column(c).is_none()) {
            return Err(SchemaError::ColumnNotFound(missing.clone()).into());
        }

        let rows = engine.scan_table(&table.name, &columns, &self.filters)?;
        Ok(ResultSet::Scan { columns, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::Scan;
    use crate::{
        error::{Error, Result, SchemaError},
        sql::{
            engine::{Engine, RowStore},
            executor::{Executor, ResultSet},
            parser::ast::Fields,
            schema::{Column, Database, Table},
            types::{DataType, Field, Row, Value},
        },
        storage::memory::MemoryEngine,
    };

    fn store() -> Result<RowStore<MemoryEngine>> {
        let mut db = Database::create("test");
        let a = Column::new("a", DataType::Int);
        let b = Column::new("b", DataType::Bool);
        db.tables.push(Table {
            name: "t".into(),
            columns: vec![a.clone(), b.clone()],
            constraints: vec![],
        });
        let mut s = RowStore::new(db, MemoryEngine::new());
        s.create_row(
            "k1",
            &Row::new(
                "t".into(),
                vec![Field::new(&b, Value::Bool(true)), Field::new(&a, Value::Int(7))],
            ),
        )?;
        Ok(s)
    }

    #[test]
    fn test_scan_all_fields_in_schema_order() -> Result<()> {
        let mut s = store()?;
        let result = Scan::new("t".into(), Fields::All, vec![]).execute(&mut s)?;
        let ResultSet::Scan { columns, rows } = result else {
            panic!("unexpected result");
        };
        assert_eq!(columns, vec!["a", "b"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields[0].value, Value::Int(7));
        assert_eq!(rows[0].fields[1].value, Value::Bool(true));
        Ok(())
    }

    #[test]
    fn test_scan_unknown() -> Result<()> {
        let mut s = store()?;
        assert_eq!(
            Scan::new("nope".into(), Fields::All, vec![]).execute(&mut s),
            Err(Error::Schema(SchemaError::TableNotFound("nope".into())))
        );
        assert_eq!(
            Scan::new("t".into(), Fields::Named(vec!["c".into()]), vec![]).execute(&mut s),
            Err(Error::Schema(SchemaError::ColumnNotFound("c".into())))
        );
        Ok(())
    }
}
