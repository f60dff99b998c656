//! Translation of a predicate set into one conjunctive query, and its
//! evaluation against a table.
//!
//! The query renders as the boolean expression the predicates stand for,
//! e.g. `temperature > 300 & pressure <= 1`. Columns are not checked when
//! translating; an unknown column is reported when the query is evaluated.
use std::fmt;

use crate::condition::{Comparison, Operand, Operator};
use crate::error::{PinpointError, Result};
use crate::predicate::PredicateSet;
use crate::table::{FilteredView, Row, Table};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    column: String,
    comparison: Comparison,
}

impl Clause {
    pub fn column(&self) -> &str {
        &self.column
    }
    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    fn evaluate(&self, row: &Row) -> Result<bool> {
        let left = lookup(row, &self.column)?;
        let right = match self.comparison.operand() {
            Operand::Literal(v) => v,
            Operand::Column(c) => lookup(row, c)?,
        };
        let operator = self.comparison.operator();
        // a missing cell behaves like NaN: unequal to everything, never ordered
        if left.is_null() || right.is_null() {
            return Ok(operator == Operator::Ne);
        }
        if !operator.is_ordering() {
            let equal = left.equals(right);
            return Ok(if operator == Operator::Eq { equal } else { !equal });
        }
        let ordering = left.order(right).ok_or_else(|| PinpointError::TypeMismatch {
            column: self.column.clone(),
            message: format!(
                "ordering comparison not allowed between {} and {}",
                left.kind(),
                right.kind()
            ),
        })?;
        Ok(match operator {
            Operator::Lt => ordering.is_lt(),
            Operator::Le => ordering.is_le(),
            Operator::Gt => ordering.is_gt(),
            Operator::Ge => ordering.is_ge(),
            Operator::Eq | Operator::Ne => unreachable!("equality handled above"),
        })
    }
}

fn lookup<'r>(row: &'r Row, column: &str) -> Result<&'r Value> {
    row.get(column).ok_or_else(|| PinpointError::UnknownColumn(column.to_string()))
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.column, self.comparison)
    }
}

/// The conjunction of every clause. An empty query matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    /// Comparisons of a column are laid out together, columns in insertion order.
    pub fn from_predicates(predicates: &PredicateSet) -> Self {
        let clauses = predicates
            .iter()
            .flat_map(|(column, comparisons)| {
                comparisons.iter().map(move |comparison| Clause {
                    column: column.to_string(),
                    comparison: comparison.clone(),
                })
            })
            .collect();
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Every clause is evaluated, so a type error anywhere surfaces even
    /// when an earlier clause already rejected the row.
    pub fn matches(&self, row: &Row) -> Result<bool> {
        let mut all = true;
        for clause in &self.clauses {
            all &= clause.evaluate(row)?;
        }
        Ok(all)
    }

    /// Filters the whole table, failing on the first column the table lacks.
    pub fn filter<'t>(&self, table: &'t Table) -> Result<FilteredView<'t>> {
        for clause in &self.clauses {
            if !table.has_column(&clause.column) {
                return Err(PinpointError::UnknownColumn(clause.column.clone()));
            }
            if let Operand::Column(other) = clause.comparison.operand() {
                if !table.has_column(other) {
                    return Err(PinpointError::UnknownColumn(other.clone()));
                }
            }
        }
        let mut indices = Vec::new();
        for (index, row) in table.rows().iter().enumerate() {
            if self.matches(row)? {
                indices.push(index);
            }
        }
        Ok(FilteredView::new(table, indices))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.clauses.iter().map(Clause::to_string).collect();
        write!(f, "{}", parts.join(" & "))
    }
}

/// Translates a predicate set into its query.
pub fn translate(predicates: &PredicateSet) -> Query {
    Query::from_predicates(predicates)
}
