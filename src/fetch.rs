//! Fetching a whole collection from a remote data source as a table.
//!
//! The data source itself is behind the [`DataSource`], [`Dataset`] and
//! [`Collection`] traits. The fetcher authenticates, picks a collection,
//! asks for every record whose reference field exists, and projects the
//! records onto the requested attributes.
use serde::Deserialize;
use tracing::{info, warn};

use std::fmt;

use crate::error::{PinpointError, Result};
use crate::table::{Row, Table};

#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Which records of a collection to retrieve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Records that hold a non-null value for the field.
    Exists(String),
}

impl Criterion {
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Criterion::Exists(field) => row.get(field).is_some_and(|v| !v.is_null()),
        }
    }
}

/// The attributes to keep in the fetched table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Attributes {
    #[default]
    All,
    Named(Vec<String>),
}

impl From<Option<Vec<String>>> for Attributes {
    fn from(names: Option<Vec<String>>) -> Self {
        match names {
            Some(names) if !names.is_empty() => Attributes::Named(names),
            _ => Attributes::All,
        }
    }
}

/// How to choose a collection when a dataset holds several.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CollectionPolicy {
    /// The first collection in the order the dataset lists them.
    #[default]
    First,
    Named(String),
}

pub trait DataSource {
    /// Opens an authenticated session on `dataset`.
    fn connect(&self, credentials: &Credentials, dataset: &str) -> Result<Box<dyn Dataset + '_>>;
}

pub trait Dataset {
    fn name(&self) -> &str;
    /// Collection names, in the dataset's own order.
    fn collections(&self) -> Vec<String>;
    fn collection(&self, name: &str) -> Result<&dyn Collection>;
}

pub trait Collection {
    fn name(&self) -> &str;
    /// The primary reference field of every record.
    fn reference(&self) -> &str;
    fn fields(&self) -> Vec<String>;
    /// Records matching `criterion`, each holding exactly `attributes`
    /// (absent values are null).
    fn fetch(&self, criterion: &Criterion, attributes: &[String]) -> Result<Vec<Row>>;
}

#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    pub dataset: String,
    pub attributes: Attributes,
    pub policy: CollectionPolicy,
}

impl FetchRequest {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self { dataset: dataset.into(), ..Self::default() }
    }
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
    pub fn policy(mut self, policy: CollectionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

pub struct Fetcher<'s> {
    source: &'s dyn DataSource,
    credentials: Credentials,
}

impl<'s> Fetcher<'s> {
    pub fn new(source: &'s dyn DataSource, credentials: Credentials) -> Self {
        Self { source, credentials }
    }

    pub fn fetch(&self, request: &FetchRequest) -> Result<Table> {
        let dataset = self.source.connect(&self.credentials, &request.dataset)?;
        let names = dataset.collections();
        info!(dataset = %dataset.name(), "Collections of this dataset");
        for name in &names {
            info!(collection = %name);
        }
        let chosen = choose_collection(&request.dataset, &names, &request.policy)?;
        let collection = dataset.collection(&chosen)?;

        let available = collection.fields();
        let attributes = match &request.attributes {
            Attributes::All => available,
            Attributes::Named(requested) => {
                let mut kept = Vec::with_capacity(requested.len());
                for name in requested {
                    if !available.contains(name) {
                        warn!(attribute = %name, collection = %chosen, "Attribute not found in the collection");
                    } else if !kept.contains(name) {
                        kept.push(name.clone());
                    }
                }
                kept
            }
        };

        let criterion = Criterion::Exists(collection.reference().to_string());
        let rows = collection.fetch(&criterion, &attributes)?;
        info!(collection = %chosen, rows = rows.len(), columns = attributes.len(), "Fetched records");
        Table::new(attributes, rows)
    }
}

fn choose_collection(dataset: &str, names: &[String], policy: &CollectionPolicy) -> Result<String> {
    match policy {
        CollectionPolicy::Named(wanted) => names
            .iter()
            .find(|n| *n == wanted)
            .cloned()
            .ok_or_else(|| PinpointError::UnknownCollection(wanted.clone())),
        CollectionPolicy::First => {
            let first = names
                .first()
                .cloned()
                .ok_or_else(|| PinpointError::EmptyDataset(dataset.to_string()))?;
            if names.len() == 1 {
                info!(collection = %first, "This is a unique collection");
            } else {
                warn!(collection = %first, others = ?&names[1..], "Several collections found, using the first");
            }
            Ok(first)
        }
    }
}
