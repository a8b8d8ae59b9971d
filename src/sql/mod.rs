//! SQL processing module
//!
//! This module provides:
//! - `parser`: SQL lexer and parser
//! - `types`: column types, values, rows and literal coercion
//! - `schema`: table, column and constraint definitions
//! - `executor`: statement execution
//! - `engine`: table-level engine over row units

pub mod parser;
pub mod types;
pub mod schema;
pub mod executor;
pub mod engine;
