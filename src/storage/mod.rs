//! Byte-level storage
//!
//! - `engine`: the storage engine trait
//! - `disk`: one file per unit, one directory per namespace
//! - `memory`: in-memory engine, used by tests

pub mod disk;
pub mod engine;
pub mod memory;
