//! Literal coercion
//!
//! Turns the textual literals of an INSERT into typed fields, checked against
//! the table schema. The schema is only read; every field is a new value.

use chrono::DateTime;

use crate::{
    error::{Result, SchemaError, ValueError},
    sql::{
        schema::Table,
        types::{DataType, Field, Value, identifier},
    },
};

/// Coerces `values` into typed fields for `fields`, in the caller's order
pub fn coerce_fields(fields: &[String], values: &[String], table: &Table) -> Result<Vec<Field>> {
    if fields.len() != values.len() {
        return Err(ValueError::LengthMismatch {
            fields: fields.len(),
            values: values.len(),
        }
        .into());
    }

    fields
        .iter()
        .zip(values)
        .map(|(name, literal)| coerce_field(table, name, literal))
        .collect()
}

fn coerce_field(table: &Table, name: &str, literal: &str) -> Result<Field> {
    let column = table
        .column(name)
        .ok_or_else(|| SchemaError::ColumnNotFound(name.to_string()))?;

    if literal.eq_ignore_ascii_case("null") {
        // Any constraint entry admits null, whatever it declares.
        return match table.constraint(name) {
            Some(_) => Ok(Field::null(column)),
            None => Err(ValueError::ColumnNotNullable(name.to_string()).into()),
        };
    }

    Ok(Field::new(column, parse_literal(column.datatype, literal)?))
}

/// Parses a non-null literal as a value of `datatype`
pub fn parse_literal(datatype: DataType, literal: &str) -> Result<Value> {
    let mismatch = || ValueError::TypeMismatch(datatype);
    Ok(match datatype {
        DataType::Bool => match literal.to_lowercase().as_ref() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(mismatch().into()),
        },
        DataType::Int => Value::Int(literal.parse().map_err(|_| mismatch())?),
        DataType::Float => Value::Float(literal.parse().map_err(|_| mismatch())?),
        DataType::String => Value::String(literal.to_string()),
        DataType::Time => {
            let time = DateTime::parse_from_rfc3339(literal).map_err(|_| mismatch())?;
            let value = Value::Time(time);
            // Only the canonical layout is accepted
            if value.canonical() != literal {
                return Err(mismatch().into());
            }
            value
        }
        DataType::Uuid => Value::Uuid(identifier::parse_identifier(literal)?),
        DataType::Bytes => {
            return Err(ValueError::UnknownColumnType(datatype.to_string()).into());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{coerce_fields, parse_literal};
    use crate::{
        error::{Error, Result, SchemaError, ValueError},
        sql::{
            schema::{Column, Constraint, Table},
            types::{DataType, Value},
        },
    };

    fn table() -> Table {
        Table {
            name: "things".into(),
            columns: vec![
                Column::new("id", DataType::Uuid),
                Column::new("flag", DataType::Bool),
                Column::new("count", DataType::Int),
                Column::new("price", DataType::Float),
                Column::new("label", DataType::String),
                Column::new("at", DataType::Time),
                Column::new("blob", DataType::Bytes),
            ],
            constraints: vec![
                Constraint::new("pk", "id").primary_key(),
                // declares nothing, still admits null
                Constraint::new("c_count", "count"),
            ],
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_coerce_in_caller_order() -> Result<()> {
        let t = table();
        let fields = coerce_fields(
            &strings(&["label", "count", "flag"]),
            &strings(&["honey", "18", "TRUE"]),
            &t,
        )?;
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["label", "count", "flag"]);
        assert_eq!(fields[0].value, Value::String("honey".into()));
        assert_eq!(fields[1].value, Value::Int(18));
        assert_eq!(fields[2].value, Value::Bool(true));
        assert!(fields.iter().all(|f| !f.null));
        Ok(())
    }

    #[test]
    fn test_round_trip_canonical() -> Result<()> {
        for (dt, literal) in [
            (DataType::Bool, "true"),
            (DataType::Bool, "false"),
            (DataType::Int, "-9223372036854775808"),
            (DataType::Int, "42"),
            (DataType::Float, "18.5"),
            (DataType::Float, "-0.001"),
            (DataType::String, "it's a string"),
            (DataType::Time, "2006-01-02T15:04:05Z"),
            (DataType::Time, "2021-11-30T23:59:59+09:00"),
            (DataType::Time, "2006-01-02T15:04:05.500Z"),
            (DataType::Time, "2006-01-02T15:04:05.000001-07:00"),
            (DataType::Uuid, "6ba7b810-9dad-11d1-80b4-00c04fd430c8"),
        ] {
            let value = parse_literal(dt, literal)?;
            assert_eq!(value.datatype(), dt);
            assert_eq!(value.canonical(), literal);
        }
        Ok(())
    }

    #[test]
    fn test_type_mismatch() {
        for (dt, literal) in [
            (DataType::Bool, "yes"),
            (DataType::Int, "18.5"),
            (DataType::Int, "99999999999999999999"),
            (DataType::Float, "abc"),
            (DataType::Time, "2006-01-02"),
            (DataType::Time, "2006-01-02T15:04:05.5Z"),
            (DataType::Time, "2006-01-02T15:04:05+00:00"),
            (DataType::Time, "2006-01-02t15:04:05z"),
            (DataType::Time, "2006-01-02 15:04:05Z"),
        ] {
            assert_eq!(
                parse_literal(dt, literal),
                Err(Error::Value(ValueError::TypeMismatch(dt)))
            );
        }
        assert!(matches!(
            parse_literal(DataType::Uuid, "not-a-uuid"),
            Err(Error::Value(ValueError::InvalidIdentifier(_)))
        ));
        assert!(matches!(
            parse_literal(DataType::Bytes, "00ff"),
            Err(Error::Value(ValueError::UnknownColumnType(_)))
        ));
    }

    #[test]
    fn test_null_gated_on_constraint_entry() -> Result<()> {
        let t = table();

        // "count" has a constraint entry that does not declare nullability
        let fields = coerce_fields(&strings(&["count"]), &strings(&["NULL"]), &t)?;
        assert!(fields[0].null);
        assert_eq!(fields[0].value, Value::Int(0));
        assert_eq!(fields[0].get(), None);

        assert_eq!(
            coerce_fields(&strings(&["price"]), &strings(&["null"]), &t),
            Err(Error::Value(ValueError::ColumnNotNullable("price".into())))
        );
        Ok(())
    }

    #[test]
    fn test_length_mismatch() {
        let t = table();
        assert_eq!(
            coerce_fields(&strings(&["a", "b"]), &strings(&["1"]), &t),
            Err(Error::Value(ValueError::LengthMismatch { fields: 2, values: 1 }))
        );
    }

    #[test]
    fn test_column_not_found() {
        let t = table();
        assert_eq!(
            coerce_fields(&strings(&["missing"]), &strings(&["1"]), &t),
            Err(Error::Schema(SchemaError::ColumnNotFound("missing".into())))
        );
    }

    #[test]
    fn test_schema_untouched() -> Result<()> {
        let t = table();
        let before = t.clone();
        coerce_fields(&strings(&["count", "label"]), &strings(&["null", "x"]), &t)?;
        assert_eq!(t, before);
        Ok(())
    }
}
