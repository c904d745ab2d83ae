//! Fixed-width text rendering of a table snapshot.

use super::Table;
use crate::core::types::Value;
use std::fmt;

const CELL_WIDTH: usize = 15;

impl fmt::Display for Table {
    /// Writes a heading line, the column names, a dashed separator, and one
    /// line per row. Every cell is left-justified in a 15-character field;
    /// floats print with six fractional digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table: {}", self.name)?;
        for col in &self.schema.columns {
            write!(f, "{:<width$}", col.name, width = CELL_WIDTH)?;
        }
        writeln!(f)?;
        for _ in &self.schema.columns {
            write!(f, "{}", "-".repeat(CELL_WIDTH))?;
        }
        writeln!(f)?;
        for row in &self.rows {
            for value in &row.values {
                match value {
                    Value::Integer(i) => write!(f, "{:<width$}", i, width = CELL_WIDTH)?,
                    Value::Float(v) => write!(f, "{:<width$.6}", v, width = CELL_WIDTH)?,
                    Value::Text(s) => write!(f, "{:<width$}", s, width = CELL_WIDTH)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
