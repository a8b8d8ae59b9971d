//! rowlite - a minimal embeddable relational engine
//!
//! This crate provides:
//! - SQL parsing (two-mode lexer, parser, AST) for INSERT, SELECT and
//!   CREATE TABLE
//! - Literal coercion against a table schema
//! - Row storage where every row is its own unit, scanned on SELECT
//! - A driver surface (`Connection`, `Rows`) with explicit registration

pub mod config;
pub mod driver;
pub mod error;
pub mod sql;
pub mod storage;
