//! The predicate set: an append-only multimap from column to comparisons.
//!
//! Comparisons on the same column are conjunctive, and so are columns.
//! Columns keep the order in which they were first constrained. Nothing is
//! ever removed or replaced, so a set only grows during a narrowing session.
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use std::fmt;

use crate::condition::Comparison;
use crate::error::{PinpointError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    constraints: IndexMap<String, Vec<Comparison>>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a comparison to the column's list, creating the list if needed.
    pub fn push(&mut self, column: impl Into<String>, comparison: Comparison) {
        self.constraints.entry(column.into()).or_default().push(comparison);
    }

    /// Parses `expression` and appends it to `column`.
    pub fn push_expression(&mut self, column: impl Into<String>, expression: &str) -> Result<()> {
        let comparison = Comparison::parse(expression)?;
        self.push(column, comparison);
        Ok(())
    }

    /// Appends every comparison of `other`, column by column.
    pub fn extend(&mut self, other: PredicateSet) {
        for (column, comparisons) in other.constraints {
            self.constraints.entry(column).or_default().extend(comparisons);
        }
    }

    pub fn get(&self, column: &str) -> Option<&[Comparison]> {
        self.constraints.get(column).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Comparison])> {
        self.constraints.iter().map(|(c, v)| (c.as_str(), v.as_slice()))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.constraints.keys().map(String::as_str)
    }

    /// Number of constrained columns.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Total number of comparisons over all columns.
    pub fn comparison_count(&self) -> usize {
        self.constraints.values().map(Vec::len).sum()
    }

    /// True when every comparison of `other` is also present here, on the same column.
    pub fn includes(&self, other: &PredicateSet) -> bool {
        other.iter().all(|(column, comparisons)| match self.get(column) {
            Some(mine) => comparisons.iter().all(|c| mine.contains(c)),
            None => comparisons.is_empty(),
        })
    }

    /// Reads the predicates file format: an object mapping each column to
    /// one expression string or an array of them.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json.as_object().ok_or_else(|| PinpointError::Condition {
            expression: json.to_string(),
            message: "predicates must be a JSON object of column to expression(s)".to_string(),
        })?;
        let mut predicates = PredicateSet::new();
        for (column, entry) in object {
            match entry {
                serde_json::Value::String(expression) => predicates.push_expression(column, expression)?,
                serde_json::Value::Array(expressions) => {
                    for expression in expressions {
                        let expression = expression.as_str().ok_or_else(|| PinpointError::Condition {
                            expression: expression.to_string(),
                            message: format!("expressions for '{}' must be strings", column),
                        })?;
                        predicates.push_expression(column, expression)?;
                    }
                }
                other => {
                    return Err(PinpointError::Condition {
                        expression: other.to_string(),
                        message: format!("'{}' must map to a string or an array of strings", column),
                    });
                }
            }
        }
        Ok(predicates)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(&json)
    }
}

impl Serialize for PredicateSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let rendered: IndexMap<&str, Vec<String>> = self
            .iter()
            .map(|(column, comparisons)| (column, comparisons.iter().map(|c| c.to_string()).collect()))
            .collect();
        rendered.serialize(serializer)
    }
}

impl fmt::Display for PredicateSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}
