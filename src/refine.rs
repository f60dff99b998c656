//! Sources of additional predicates while a narrowing session is undecided.
//!
//! The interactive source reads one line per request in the form
//! `field,operator,value`, e.g. `pressure,<=,1`. Typing `cancel`, `quit` or
//! `q`, or closing the input, ends the session without a result.
use std::io::{self, BufRead, Write};

use crate::condition::Comparison;
use crate::error::{PinpointError, Result};
use crate::predicate::PredicateSet;

const CANCEL_WORDS: [&str; 3] = ["cancel", "quit", "q"];

#[derive(Debug, Clone, PartialEq)]
pub enum Refinement {
    /// Add one more comparison on a column.
    Add { column: String, comparison: Comparison },
    /// Stop narrowing.
    Cancel,
}

/// Parses one line typed at the refinement prompt.
///
/// The line is split on its first two commas, so the value itself may
/// contain commas. Surrounding whitespace of each part is ignored.
pub fn parse_refinement(line: &str) -> Result<Refinement> {
    let trimmed = line.trim();
    if CANCEL_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
        return Ok(Refinement::Cancel);
    }
    let invalid = |message: &str| PinpointError::Condition {
        expression: trimmed.to_string(),
        message: message.to_string(),
    };
    let mut parts = trimmed.splitn(3, ',');
    let (Some(column), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("expected field,operator,value"));
    };
    let column = column.trim();
    if column.is_empty() {
        return Err(invalid("field name is empty"));
    }
    if value.trim().is_empty() {
        return Err(invalid("value is empty"));
    }
    let comparison = Comparison::from_parts(operator, value)?;
    Ok(Refinement::Add { column: column.to_string(), comparison })
}

pub trait RefinementSource {
    /// Called whenever more than one row survives the current predicates.
    fn refine(&mut self, remaining: usize, predicates: &PredicateSet) -> Result<Refinement>;
}

impl<F> RefinementSource for F
where
    F: FnMut(usize, &PredicateSet) -> Result<Refinement>,
{
    fn refine(&mut self, remaining: usize, predicates: &PredicateSet) -> Result<Refinement> {
        self(remaining, predicates)
    }
}

/// Prompts on `output` and reads answers line by line from `input`.
/// Malformed lines are reported and the prompt is repeated.
pub struct LineRefinement<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineRefinement<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
    pub fn into_output(self) -> W {
        self.output
    }
}

impl LineRefinement<io::StdinLock<'static>, io::Stdout> {
    /// The terminal: standard input and standard output.
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> RefinementSource for LineRefinement<R, W> {
    fn refine(&mut self, remaining: usize, _predicates: &PredicateSet) -> Result<Refinement> {
        writeln!(
            self.output,
            "{} entries found. Please provide additional filtering conditions.",
            remaining
        )?;
        loop {
            write!(self.output, "Enter additional conditions (field,operator,value): ")?;
            self.output.flush()?;
            let mut entered = String::new();
            if self.input.read_line(&mut entered)? == 0 {
                writeln!(self.output)?;
                return Ok(Refinement::Cancel);
            }
            match parse_refinement(&entered) {
                Ok(refinement) => return Ok(refinement),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }
}
