use std::fmt::Display;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::sql::schema::Column;

pub mod coercion;
pub mod identifier;

/// Supported column data types
///
/// Persisted by ordinal (1..=7); the order must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DataType {
    Bool,
    Int,
    Float,
    String,
    Time,
    Bytes,
    Uuid,
}

impl DataType {
    pub fn ordinal(&self) -> u8 {
        match self {
            DataType::Bool => 1,
            DataType::Int => 2,
            DataType::Float => 3,
            DataType::String => 4,
            DataType::Time => 5,
            DataType::Bytes => 6,
            DataType::Uuid => 7,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<DataType> {
        Some(match ordinal {
            1 => DataType::Bool,
            2 => DataType::Int,
            3 => DataType::Float,
            4 => DataType::String,
            5 => DataType::Time,
            6 => DataType::Bytes,
            7 => DataType::Uuid,
            _ => return None,
        })
    }

    /// Resolves a type name as written in CREATE TABLE (case-insensitive)
    pub fn from_name(name: &str) -> Option<DataType> {
        Some(match name.to_uppercase().as_ref() {
            "BOOL" | "BOOLEAN" => DataType::Bool,
            "INT" | "INTEGER" => DataType::Int,
            "FLOAT" | "DOUBLE" => DataType::Float,
            "STRING" | "TEXT" | "VARCHAR" => DataType::String,
            "TIME" | "TIMESTAMP" => DataType::Time,
            "BYTES" => DataType::Bytes,
            "UUID" => DataType::Uuid,
            _ => return None,
        })
    }

    pub fn to_str(&self) -> &str {
        match self {
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Time => "time",
            DataType::Bytes => "bytes",
            DataType::Uuid => "uuid",
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        value.ordinal()
    }
}

impl TryFrom<u8> for DataType {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        DataType::from_ordinal(value)
            .ok_or_else(|| format!("unknown column type ordinal {}", value))
    }
}

/// A typed column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Time(DateTime<FixedOffset>),
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
    Uuid([u8; 16]),
}

impl Value {
    /// The zero value held by a null slot of the given type
    pub fn zero(datatype: DataType) -> Self {
        match datatype {
            DataType::Bool => Value::Bool(false),
            DataType::Int => Value::Int(0),
            DataType::Float => Value::Float(0.0),
            DataType::String => Value::String(String::new()),
            DataType::Time => Value::Time(DateTime::<Utc>::UNIX_EPOCH.fixed_offset()),
            DataType::Bytes => Value::Bytes(Vec::new()),
            DataType::Uuid => Value::Uuid([0; 16]),
        }
    }

    pub fn datatype(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Bool,
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
            Value::String(_) => DataType::String,
            Value::Time(_) => DataType::Time,
            Value::Bytes(_) => DataType::Bytes,
            Value::Uuid(_) => DataType::Uuid,
        }
    }

    /// Canonical textual form, the inverse of literal coercion
    pub fn canonical(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::String(v) => v.clone(),
            Value::Time(t) => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Value::Bytes(b) => b.iter().map(|byte| format!("{:02x}", byte)).collect(),
            Value::Uuid(id) => identifier::format_identifier(id),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// A column instance holding one row's data
///
/// Built fresh for every row from the schema column; `value` always matches
/// `datatype`, and holds the zero value when `null` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub datatype: DataType,
    pub null: bool,
    pub value: Value,
}

impl Field {
    pub fn new(column: &Column, value: Value) -> Self {
        Self {
            name: column.name.clone(),
            datatype: column.datatype,
            null: false,
            value,
        }
    }

    pub fn null(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            datatype: column.datatype,
            null: true,
            value: Value::zero(column.datatype),
        }
    }

    /// The value, or None for a null field
    pub fn get(&self) -> Option<&Value> {
        (!self.null).then_some(&self.value)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.get() {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("NULL"),
        }
    }
}

/// A single row of table data, as written to its row unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub table_name: String,
    pub fields: Vec<Field>,
    /// Tombstone flag; nothing sets it yet, so scans do not consult it
    pub deleted: bool,
}

impl Row {
    pub fn new(table_name: String, fields: Vec<Field>) -> Self {
        Self {
            table_name,
            fields,
            deleted: false,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
