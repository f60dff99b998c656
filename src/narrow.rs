//! The narrowing engine: reduce a table to exactly one row.
//!
//! Each round translates the whole predicate set into a query and filters
//! the complete table with it, never the previous view. One row left
//! resolves the session, no rows exhausts it, and anything more asks the
//! refinement source for one more comparison, which is appended to the set.
//! Predicates are only ever added, so a bad one cannot be taken back; it can
//! only be compensated for by further constraints.
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::predicate::PredicateSet;
use crate::query::translate;
use crate::refine::{Refinement, RefinementSource};
use crate::table::{Row, Table};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NarrowingOptions {
    /// Log the query, the predicate set and the surviving rows each round.
    pub verbose: bool,
    /// Stop after this many refinements; `None` asks for as many as it takes.
    pub max_refinements: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Exactly one row satisfied the predicates.
    Resolved(Row),
    /// No row satisfied the predicates.
    Exhausted,
    /// The refinement source gave up.
    Cancelled,
    /// The refinement limit was hit with rows still undecided.
    LimitReached { remaining: usize },
}

impl Outcome {
    pub fn into_row(self) -> Option<Row> {
        match self {
            Outcome::Resolved(row) => Some(row),
            _ => None,
        }
    }
    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved(_))
    }
}

/// The state reached by one filtering round.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<'t> {
    Resolved(&'t Row),
    Exhausted,
    AwaitingRefinement(usize),
}

pub struct Narrower<'t> {
    table: &'t Table,
    options: NarrowingOptions,
}

impl<'t> Narrower<'t> {
    pub fn new(table: &'t Table, options: NarrowingOptions) -> Self {
        Self { table, options }
    }

    pub fn options(&self) -> &NarrowingOptions {
        &self.options
    }

    /// Filters the full table once with the current predicates.
    pub fn step(&self, predicates: &PredicateSet) -> Result<Step<'t>> {
        let query = translate(predicates);
        if self.options.verbose {
            info!(query = %query, "Conditions to be queried");
            info!(columns = ?self.table.columns(), "Data columns");
        }
        let view = query.filter(self.table)?;
        info!(rows = view.len(), "Number of rows after filtering");
        if self.options.verbose {
            for row in view.rows() {
                info!(row = %row, "Data after filtering");
            }
        }
        Ok(match view.single() {
            Some(row) => Step::Resolved(row),
            None if view.is_empty() => Step::Exhausted,
            None => Step::AwaitingRefinement(view.len()),
        })
    }

    /// Runs a narrowing session, appending every refinement to `predicates`.
    pub fn run<S>(&self, predicates: &mut PredicateSet, source: &mut S) -> Result<Outcome>
    where
        S: RefinementSource + ?Sized,
    {
        let mut refinements = 0usize;
        loop {
            match self.step(predicates)? {
                Step::Resolved(row) => {
                    if self.options.verbose {
                        info!(refinements, "Filtering complete. Proceeding with the single entry.");
                    }
                    return Ok(Outcome::Resolved(row.clone()));
                }
                Step::Exhausted => {
                    warn!(predicates = %predicates, "No elements left after filtering");
                    return Ok(Outcome::Exhausted);
                }
                Step::AwaitingRefinement(remaining) => {
                    if let Some(max) = self.options.max_refinements {
                        if refinements >= max {
                            warn!(remaining, max, "Refinement limit reached before a single entry was left");
                            return Ok(Outcome::LimitReached { remaining });
                        }
                    }
                    if self.options.verbose {
                        info!(predicates = %predicates, "More than one entry found");
                    }
                    match source.refine(remaining, predicates)? {
                        Refinement::Add { column, comparison } => {
                            info!(column = %column, comparison = %comparison, "Adding condition");
                            predicates.push(column, comparison);
                            refinements += 1;
                        }
                        Refinement::Cancel => {
                            warn!(remaining, "Narrowing cancelled");
                            return Ok(Outcome::Cancelled);
                        }
                    }
                }
            }
        }
    }
}

/// Narrows `table` to a single row, growing `predicates` as refinements arrive.
pub fn narrow<S>(
    table: &Table,
    predicates: &mut PredicateSet,
    source: &mut S,
    options: &NarrowingOptions,
) -> Result<Outcome>
where
    S: RefinementSource + ?Sized,
{
    Narrower::new(table, options.clone()).run(predicates, source)
}
