#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::float_cmp,
    clippy::module_inception
)]

//! # Scratchdb - An In-Memory Relational Table Engine
//!
//! Scratchdb is an embeddable, process-local store of named tables, each
//! with a typed column schema and a row-major body of cell values. It is a
//! typed relational scratchpad for short-lived work, not a persistent
//! database: nothing ever touches disk.
//!
//! ## Features
//!
//! - **Typed cells**: integer, float, and text columns; text cells own
//!   their buffers
//! - **Constraints**: per-column primary keys and name-resolved foreign
//!   keys, enforced at mutation time
//! - **Schema alteration**: column add/drop and whole-table transformation
//!   that rewrite every row in lockstep
//! - **Single-writer transactions**: undo logging, coarse table locks, and
//!   deferred foreign-key re-validation at commit
//!
//! ## Quick Start
//!
//! ```rust
//! use scratchdb::{ColumnDef, Database, DataType, Value};
//!
//! # fn main() -> Result<(), scratchdb::DbError> {
//! let mut db = Database::new();
//! db.create_table("users", vec![
//!     ColumnDef::primary_key("id", DataType::Integer),
//!     ColumnDef::new("name", DataType::Text),
//! ])?;
//!
//! db.begin_transaction()?;
//! db.insert_row("users", vec![Value::Integer(1), Value::Text("alice".into())])?;
//! db.commit_transaction()?;
//!
//! assert_eq!(db.table("users").map(|t| t.num_rows()), Some(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **API Layer**: re-exports in [`api`]
//! - **Catalog**: name-to-table registry; tables are owned by the catalog
//! - **Table Layer**: schema, rows, and foreign-key descriptors with the
//!   raw storage primitives
//! - **Engine**: constraint-checked mutation and schema alteration over the
//!   catalog
//! - **Transaction Layer**: the single active transaction, its undo log,
//!   and advisory table locks

pub mod api;
pub mod core;

// Public API exports
pub use api::{
    Catalog, ColumnDef, Config, Database, DataType, DbError, ForeignKeyDef, Row, Schema, Table,
    TransactionId, Value,
};
