// src/api/mod.rs

//! Public interface of the engine.
//!
//! Everything a typical embedder needs is re-exported here: the [`Database`]
//! façade, the table and catalog types behind it, the cell data model, and
//! the crate-wide error type.

pub use crate::core::catalog::Catalog;
pub use crate::core::common::{DbError, TransactionId};
pub use crate::core::config::Config;
pub use crate::core::engine::Database;
pub use crate::core::table::Table;
pub use crate::core::types::{ColumnDef, DataType, ForeignKeyDef, Row, Schema, Value};
