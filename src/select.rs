//! The select workflow: read a table and a predicates file, narrow the table
//! to one row and save the attributes of that row.
//!
//! Nothing is written unless the narrowing resolves.
use tracing::{info, warn};

use std::path::PathBuf;

use crate::error::Result;
use crate::extract::{ExtractionRecord, ExtractorOptions, extract};
use crate::narrow::{NarrowingOptions, Outcome, narrow};
use crate::persist::{read_predicates, read_table, write_record};
use crate::refine::RefinementSource;

#[derive(Debug, Clone)]
pub struct Selection {
    /// Table file (banner line, header, records).
    pub table: PathBuf,
    /// Predicates file.
    pub conditions: PathBuf,
    /// Extra attributes to save besides the mandatory ones.
    pub attributes: Vec<String>,
    /// Where the extraction record is written.
    pub output: PathBuf,
    pub narrowing: NarrowingOptions,
    pub extraction: ExtractorOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selected {
    /// The record that was written to the output file.
    Saved(ExtractionRecord),
    /// The session ended without a single row; the outcome says why.
    Unresolved(Outcome),
}

impl Selection {
    pub fn run<S>(&self, source: &mut S) -> Result<Selected>
    where
        S: RefinementSource + ?Sized,
    {
        let mut predicates = read_predicates(&self.conditions)?;
        info!(predicates = %predicates, "Filtering process");
        let table = read_table(&self.table)?;

        let row = match narrow(&table, &mut predicates, source, &self.narrowing)? {
            Outcome::Resolved(row) => row,
            other => {
                warn!(outcome = ?other, "No single entry selected, nothing saved");
                return Ok(Selected::Unresolved(other));
            }
        };

        let record = extract(&row, &self.attributes, &self.extraction)?;
        if self.extraction.verbose {
            for (attribute, value) in record.iter() {
                info!(attribute, value = %value, "Chosen attribute for simulation");
            }
        }
        write_record(&record, &self.output)?;
        Ok(Selected::Saved(record))
    }
}
