//! Pinpoint – fetch a tabular dataset and narrow it down to one record.
//!
//! The crate serves two pipelines that form one workflow:
//!
//! * **Fetching**: authenticate against a [`fetch::DataSource`], pick a
//!   collection, retrieve every record whose reference field exists,
//!   project it onto the wanted attributes and save it as a table file.
//! * **Selecting**: read the table file and a predicates file, narrow the
//!   table interactively until exactly one row is left, then extract the
//!   attributes a simulation needs into a JSON file.
//!
//! ## Modules
//! * [`value`] – The [`value::Value`] cell type and how text cells are typed.
//! * [`table`] – [`table::Table`], [`table::Row`] and filtered views.
//! * [`condition`] – Comparison expressions such as `"> 300"` (pest grammar in `condition.pest`).
//! * [`predicate`] – The append-only [`predicate::PredicateSet`].
//! * [`query`] – Translation of predicate sets into one conjunctive query and its evaluation.
//! * [`narrow`] – The narrowing engine.
//! * [`refine`] – Where additional predicates come from (the terminal, or anything
//!   implementing [`refine::RefinementSource`]).
//! * [`select`] – The select workflow from files to the saved record.
//! * [`extract`] – Building the [`extract::ExtractionRecord`] from the resolved row.
//! * [`fetch`] / [`source`] – Data source abstraction, fetcher and an in-process source.
//! * [`persist`] – Table, predicate and record files.
//! * [`settings`] / [`logging`] – Configuration and tracing setup for the binaries.
//!
//! ## Quick Start
//! ```
//! use pinpoint::{narrow::{narrow, NarrowingOptions, Outcome}, persist::parse_table,
//!                predicate::PredicateSet, refine::parse_refinement};
//! let table = parse_table("banner\ntemperature,pressure\n350,1\n400,2\n", "inline").unwrap();
//! let mut predicates = PredicateSet::from_json_str(r#"{"temperature": "> 300"}"#).unwrap();
//! let mut answer = |_: usize, _: &PredicateSet| parse_refinement("pressure,<=,1");
//! let outcome = narrow(&table, &mut predicates, &mut answer, &NarrowingOptions::default()).unwrap();
//! assert!(matches!(outcome, Outcome::Resolved(_)));
//! ```

pub mod condition;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod narrow;
pub mod persist;
pub mod predicate;
pub mod query;
pub mod refine;
pub mod select;
pub mod settings;
pub mod source;
pub mod table;
pub mod value;

pub use error::{PinpointError, Result};
