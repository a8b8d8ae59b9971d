use std::{fmt::Display, io, string::FromUtf8Error, sync::PoisonError};

use bincode::ErrorKind;
use serde::{de, ser};
use thiserror::Error;

use crate::sql::types::DataType;

/// Custom Result type for rowlite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for rowlite
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Unexpected token while parsing a statement
    #[error("parse error: found {found:?}, expected {expected}")]
    Parse { expected: String, found: String },
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("value error: {0}")]
    Value(#[from] ValueError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// Recognized operation without an implementation
    #[error("{0} not implemented")]
    Unimplemented(String),
    /// Internal error (serialization, locking, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn parse(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::Parse {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("no such table {0}")]
    TableNotFound(String),
    #[error("no such column {0}")]
    ColumnNotFound(String),
    /// Table definition failed validation
    #[error("invalid table {table}: {reason}")]
    InvalidTable { table: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("value type not {0}")]
    TypeMismatch(DataType),
    #[error("invalid uuid {0:?}")]
    InvalidIdentifier(String),
    #[error("columns and values length not match ({fields} fields, {values} values)")]
    LengthMismatch { fields: usize, values: usize },
    #[error("column {0} not nullable")]
    ColumnNotNullable(String),
    #[error("unknown column type {0}")]
    UnknownColumnType(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("data row too big ({size} bytes, limit {limit})")]
    DataTooBig { size: usize, limit: usize },
    /// Identity text that cannot address a row unit
    #[error("invalid row key {0:?}")]
    InvalidKey(String),
    #[error("read failed: {0}")]
    Read(String),
    #[error("write failed: {0}")]
    Write(String),
}

impl<T> From<PoisonError<T>> for Error {
    fn from(value: PoisonError<T>) -> Self {
        Error::Internal(value.to_string())
    }
}

impl From<Box<ErrorKind>> for Error {
    fn from(value: Box<ErrorKind>) -> Self {
        Error::Internal(value.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Internal(value.to_string())
    }
}

impl From<FromUtf8Error> for Error {
    fn from(value: FromUtf8Error) -> Self {
        Error::Internal(value.to_string())
    }
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Internal(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Internal(msg.to_string())
    }
}
