//! Dirty tables
//!
//! A `Table` is an ordered set of named columns of JSON cells. It is the
//! input type for featurization: cells may mix numbers, strings, booleans,
//! nulls and arrays. Tables are never mutated by the pipeline; every
//! projection returns a new table.

use crate::cell::as_labels;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single named column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// No cell carries a label: every value is missing or an empty list
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|v| as_labels(v).is_empty())
    }
}

/// Column-ordered table of JSON cells
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table from columns; all columns must have the same length
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, Column::len);
        for column in &columns {
            if column.len() != n_rows {
                return Err(Error::shape(
                    format!("column '{}' length", column.name),
                    n_rows,
                    column.len(),
                ));
            }
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(Error::config(format!("duplicate column name '{}'", column.name)));
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Build a table from JSON object records
    ///
    /// Column order follows first appearance across records; keys absent from
    /// a record become nulls.
    pub fn from_records(records: &[Value]) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        for (row, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| {
                Error::config(format!("record {} is not a JSON object", row))
            })?;
            for key in object.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
        }

        let columns = names
            .into_iter()
            .map(|name| {
                let values = records
                    .iter()
                    .map(|r| r.get(&name).cloned().unwrap_or(Value::Null))
                    .collect();
                Column::new(name, values)
            })
            .collect();

        Self::from_columns(columns)
    }

    #[inline]
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Restrict to `names`, in the order given
    ///
    /// Unknown names are a configuration error naming the first offender.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let column = self.column(name).ok_or_else(|| {
                Error::config(format!(
                    "use_columns references unknown column '{}'; available columns: {:?}",
                    name,
                    self.column_names()
                ))
            })?;
            if columns.iter().any(|c: &Column| c.name == name) {
                continue;
            }
            columns.push(column.clone());
        }
        Ok(Table {
            columns,
            n_rows: self.n_rows,
        })
    }

    /// Drop the named columns, ignoring names that are not present
    #[must_use]
    pub fn without<S: AsRef<str>>(&self, names: &[S]) -> Table {
        let columns = self
            .columns
            .iter()
            .filter(|c| !names.iter().any(|n| n.as_ref() == c.name))
            .cloned()
            .collect();
        Table {
            columns,
            n_rows: self.n_rows,
        }
    }

    /// Copy with every non-null cell rendered as a string
    ///
    /// Arrays become their JSON text, which is how an untyped export of a
    /// dirty table usually looks.
    #[must_use]
    pub fn to_strings(&self) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let values = c
                    .values
                    .iter()
                    .map(|v| match v {
                        Value::Null => Value::Null,
                        Value::String(_) => v.clone(),
                        other => Value::String(other.to_string()),
                    })
                    .collect();
                Column::new(c.name.clone(), values)
            })
            .collect();
        Table {
            columns,
            n_rows: self.n_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new("a", vec![json!(1), json!(2)]),
            Column::new("b", vec![json!("x"), json!("y")]),
            Column::new("c", vec![json!([1]), json!([])]),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let result = Table::from_columns(vec![
            Column::new("a", vec![json!(1), json!(2)]),
            Column::new("b", vec![json!(1)]),
        ]);
        assert!(matches!(result, Err(Error::DataShape { expected: 2, actual: 1, .. })));
    }

    #[test]
    fn test_from_records_fills_nulls() {
        let table = Table::from_records(&[json!({"a": 1, "b": "x"}), json!({"a": 2, "c": true})]).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert_eq!(table.column("b").unwrap().values[1], Value::Null);
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_select_keeps_order_and_rejects_unknown() {
        let table = sample();
        let selected = table.select(&["c", "a"]).unwrap();
        assert_eq!(selected.column_names(), vec!["c", "a"]);
        assert_eq!(selected.n_rows(), 2);

        let err = table.select(&["a", "zzz"]).unwrap_err();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("zzz")));
    }

    #[test]
    fn test_blank_columns() {
        assert!(Column::new("a", vec![json!(null), json!(""), json!("NaN"), json!([])]).is_blank());
        assert!(!Column::new("b", vec![json!(null), json!(0)]).is_blank());
        assert!(!Column::new("c", vec![json!([]), json!(["x"])]).is_blank());
        assert!(!sample().columns().iter().any(Column::is_blank));
    }

    #[test]
    fn test_without_and_to_strings() {
        let table = sample();
        let rest = table.without(&["b"]);
        assert_eq!(rest.column_names(), vec!["a", "c"]);

        let strings = table.to_strings();
        assert_eq!(strings.column("a").unwrap().values[0], json!("1"));
        assert_eq!(strings.column("c").unwrap().values[0], json!("[1]"));
        // source untouched
        assert_eq!(table.column("a").unwrap().values[0], json!(1));
    }
}
