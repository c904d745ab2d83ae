//! Schema alteration: column add/drop and whole-table transformation.
//!
//! These operations rewrite every row in lockstep with the new schema and
//! are applied immediately; they are not captured by the undo log and
//! cannot be rolled back.

use super::Table;
use crate::core::common::DbError;
use crate::core::types::{ColumnDef, DataType, Row, Value};

impl Table {
    /// Appends a column and initializes the new cell of every existing row
    /// from `default_value`.
    ///
    /// # Errors
    ///
    /// Returns `DbError::TypeMismatch` when the default's variant does not
    /// match `data_type`; the table is left untouched.
    pub fn add_column(
        &mut self,
        name: &str,
        data_type: DataType,
        default_value: Value,
    ) -> Result<(), DbError> {
        if default_value.get_type() != data_type {
            return Err(DbError::TypeMismatch {
                expected: data_type,
                found: default_value.get_type(),
            });
        }
        self.schema.columns.push(ColumnDef::new(name, data_type));
        for row in &mut self.rows {
            row.values.push(default_value.clone());
        }
        Ok(())
    }

    /// Removes the column named `name` from the schema and from every row.
    /// Column indices after the dropped one decrement by one; foreign-key
    /// descriptors owned by the dropped column are removed with it and
    /// descriptors on later columns are re-anchored.
    pub fn drop_column(&mut self, name: &str) -> Result<(), DbError> {
        let idx = self
            .schema
            .get_column_index(name)
            .ok_or_else(|| DbError::ColumnNotFound(name.to_string()))?;
        self.schema.columns.remove(idx);
        for row in &mut self.rows {
            row.values.remove(idx);
        }
        self.foreign_keys.retain(|fk| fk.column_index != idx);
        for fk in &mut self.foreign_keys {
            if fk.column_index > idx {
                fk.column_index -= 1;
            }
        }
        Ok(())
    }

    /// Builds a fresh table under the same name with schema `new_columns`.
    ///
    /// For each existing row, a cell is carried over when the old schema has
    /// a column with the same name and identical type; otherwise the cell
    /// becomes the type's zero value (`0`, `0.0`, empty string). The old
    /// table is left as-is; the caller decides whether to swap the result
    /// into the catalog.
    pub fn transform(&self, new_columns: Vec<ColumnDef>) -> Result<Table, DbError> {
        let mut new_table = Table::with_capacity(&self.name, new_columns, self.rows.capacity())?;
        for row in &self.rows {
            let values = new_table
                .schema
                .columns
                .iter()
                .map(|col| match self.schema.get_column_index(&col.name) {
                    Some(k) if self.schema.columns[k].data_type == col.data_type => {
                        row.values[k].clone()
                    }
                    _ => Value::zero_of(col.data_type),
                })
                .collect();
            new_table.push_row(Row::new(values));
        }
        Ok(new_table)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Schema;

    fn two_row_table() -> Table {
        let mut table =
            Table::new("t", vec![ColumnDef::new("a", DataType::Integer)]).unwrap();
        table.push_row(Row::new(vec![Value::Integer(1)]));
        table.push_row(Row::new(vec![Value::Integer(2)]));
        table
    }

    #[test]
    fn add_column_fills_default_into_every_row() {
        let mut table = two_row_table();
        table
            .add_column("b", DataType::Text, Value::Text("x".to_string()))
            .unwrap();
        assert_eq!(table.num_columns(), 2);
        for row in table.rows() {
            assert_eq!(row.len(), 2);
            assert_eq!(row.values[1], Value::Text("x".to_string()));
        }
    }

    #[test]
    fn add_column_rejects_mismatched_default() {
        let mut table = two_row_table();
        let before = table.clone();
        assert!(matches!(
            table.add_column("b", DataType::Text, Value::Integer(0)),
            Err(DbError::TypeMismatch { .. })
        ));
        assert_eq!(table, before);
    }

    #[test]
    fn add_then_drop_restores_original_cells() {
        let mut table = two_row_table();
        let original: Vec<Row> = table.rows().to_vec();
        table
            .add_column("b", DataType::Text, Value::Text("x".to_string()))
            .unwrap();
        table.drop_column("b").unwrap();
        assert_eq!(table.num_columns(), 1);
        assert_eq!(table.rows(), &original[..]);
    }

    #[test]
    fn drop_missing_column() {
        let mut table = two_row_table();
        assert_eq!(
            table.drop_column("zzz"),
            Err(DbError::ColumnNotFound("zzz".to_string()))
        );
    }

    #[test]
    fn drop_sole_column_leaves_empty_rows() {
        let mut table = two_row_table();
        table.drop_column("a").unwrap();
        assert_eq!(table.num_columns(), 0);
        assert_eq!(table.num_rows(), 2);
        assert!(table.rows().iter().all(Row::is_empty));
    }

    #[test]
    fn drop_column_cascades_foreign_keys() {
        let mut table = Table::new(
            "t",
            vec![
                ColumnDef::new("a", DataType::Integer),
                ColumnDef::new("b", DataType::Integer),
                ColumnDef::new("c", DataType::Integer),
            ],
        )
        .unwrap();
        table.add_foreign_key("b", "p", "id").unwrap();
        table.add_foreign_key("c", "q", "id").unwrap();

        table.drop_column("b").unwrap();

        // The dropped column's descriptor is gone; the one on "c" follows
        // its column to the new index.
        assert_eq!(table.foreign_keys().len(), 1);
        let c_index = table.schema().get_column_index("c").unwrap();
        assert_eq!(c_index, 1);
        let fk = table.foreign_key_for(c_index).unwrap();
        assert_eq!(fk.referenced_table, "q");
        assert!(table.schema().columns[c_index].is_foreign_key);
    }

    #[test]
    fn transform_copies_matching_cells_and_zeroes_the_rest() {
        let mut table = Table::new(
            "t",
            vec![
                ColumnDef::new("a", DataType::Integer),
                ColumnDef::new("b", DataType::Text),
            ],
        )
        .unwrap();
        table.push_row(Row::new(vec![
            Value::Integer(1),
            Value::Text("hi".to_string()),
        ]));

        // "a" keeps its name but changes type; "c" is new.
        let new_table = table
            .transform(vec![
                ColumnDef::new("a", DataType::Text),
                ColumnDef::new("c", DataType::Integer),
            ])
            .unwrap();

        assert_eq!(new_table.name(), "t");
        assert_eq!(new_table.num_rows(), 1);
        assert_eq!(new_table.rows()[0].values[0], Value::Text(String::new()));
        assert_eq!(new_table.rows()[0].values[1], Value::Integer(0));
    }

    #[test]
    fn transform_preserves_schema_shape() {
        let table = two_row_table();
        let new_table = table
            .transform(vec![
                ColumnDef::new("a", DataType::Integer),
                ColumnDef::new("b", DataType::Float),
            ])
            .unwrap();
        assert_eq!(
            new_table.schema(),
            &Schema::new(vec![
                ColumnDef::new("a", DataType::Integer),
                ColumnDef::new("b", DataType::Float),
            ])
        );
        assert_eq!(new_table.rows()[0].values[0], Value::Integer(1));
        assert_eq!(new_table.rows()[1].values[0], Value::Integer(2));
    }
}
