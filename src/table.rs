use indexmap::IndexMap;
use serde::Serialize;

use std::fmt;

use crate::error::{PinpointError, Result};
use crate::value::Value;

// ---------------- Row -----------------
/// One record: column name to value, in column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self { fields: IndexMap::new() }
    }
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }
    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fields: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{{{}}}", fields.join(", "))
    }
}

// --------------- Table ----------------
/// An ordered, immutable sequence of rows sharing one column set.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table, rejecting any row whose column set differs from `columns`.
    /// Row fields are reordered to follow `columns`.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        for (i, c) in columns.iter().enumerate() {
            if columns[..i].contains(c) {
                return Err(PinpointError::Schema(format!("duplicate column '{}'", c)));
            }
        }
        let mut ordered = Vec::with_capacity(rows.len());
        for (index, mut row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() || !columns.iter().all(|c| row.contains(c)) {
                let found: Vec<&str> = row.columns().collect();
                return Err(PinpointError::Schema(format!(
                    "row {} has columns {:?}, expected {:?}",
                    index, found, columns
                )));
            }
            let fields = columns
                .iter()
                .map(|c| (c.clone(), row.fields.shift_remove(c).unwrap_or(Value::Null)))
                .collect();
            ordered.push(Row { fields });
        }
        Ok(Self { columns, rows: ordered })
    }

    /// Builds a table from positional records, one value per column.
    pub fn from_records(columns: Vec<String>, records: Vec<Vec<Value>>) -> Result<Self> {
        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            if record.len() != columns.len() {
                return Err(PinpointError::Schema(format!(
                    "record {} has {} values, expected {}",
                    index,
                    record.len(),
                    columns.len()
                )));
            }
            rows.push(columns.iter().cloned().zip(record).collect());
        }
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    /// A view over every row of the table.
    pub fn full_view(&self) -> FilteredView<'_> {
        FilteredView { table: self, indices: (0..self.rows.len()).collect() }
    }
}

// ------------ FilteredView ------------
/// The rows of a table that satisfied a query, by position in the table.
#[derive(Debug, Clone)]
pub struct FilteredView<'t> {
    table: &'t Table,
    indices: Vec<usize>,
}

impl<'t> FilteredView<'t> {
    pub(crate) fn new(table: &'t Table, indices: Vec<usize>) -> Self {
        Self { table, indices }
    }
    pub fn table(&self) -> &'t Table {
        self.table
    }
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
    pub fn rows(&self) -> impl Iterator<Item = &'t Row> + '_ {
        let table = self.table;
        self.indices.iter().map(move |i| &table.rows[*i])
    }
    /// The surviving row when exactly one is left.
    pub fn single(&self) -> Option<&'t Row> {
        match self.indices.as_slice() {
            [only] => Some(&self.table.rows[*only]),
            _ => None,
        }
    }
    /// True when every row of this view is also in `other`.
    pub fn is_subset_of(&self, other: &FilteredView<'_>) -> bool {
        self.indices.iter().all(|i| other.indices.binary_search(i).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["temperature".to_string(), "pressure".to_string()]
    }

    #[test]
    fn rows_follow_column_order() {
        let row = Row::new().with("pressure", 1i64).with("temperature", 310i64);
        let table = Table::new(columns(), vec![row]).expect("valid table");
        let order: Vec<&str> = table.rows()[0].columns().collect();
        assert_eq!(order, vec!["temperature", "pressure"]);
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        let row = Row::new().with("temperature", 310i64);
        let err = Table::new(columns(), vec![row]).unwrap_err();
        assert!(matches!(err, PinpointError::Schema(_)));
        let err = Table::from_records(columns(), vec![vec![Value::Int(1)]]).unwrap_err();
        assert!(format!("{}", err).contains("expected 2"));
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let cols = vec!["a".to_string(), "a".to_string()];
        assert!(Table::new(cols, vec![]).is_err());
    }

    #[test]
    fn view_single_and_subset() {
        let table = Table::from_records(
            columns(),
            vec![vec![Value::Int(1), Value::Int(2)], vec![Value::Int(3), Value::Int(4)]],
        )
        .expect("valid table");
        let all = table.full_view();
        let one = FilteredView::new(&table, vec![1]);
        assert!(all.single().is_none());
        assert_eq!(one.single().and_then(|r| r.get("temperature")), Some(&Value::Int(3)));
        assert!(one.is_subset_of(&all));
        assert!(!all.is_subset_of(&one));
    }
}
