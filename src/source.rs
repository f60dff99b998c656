//! An in-process data source, built in code or loaded from a JSON document.
//!
//! Document layout:
//!
//! ```json
//! {
//!   "users": { "test": "test" },
//!   "datasets": {
//!     "Atomistic_Numerical_Simulations": {
//!       "simulations": {
//!         "reference": "id",
//!         "fields": ["id", "temperature"],
//!         "records": [ { "id": 1, "temperature": 300 } ]
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! `fields` may be omitted, in which case it is the reference field followed
//! by every other field in the order first seen in the records.
use indexmap::IndexMap;
use serde::Deserialize;

use std::collections::HashMap;
use std::path::Path;

use crate::error::{PinpointError, Result};
use crate::fetch::{Collection, Credentials, Criterion, DataSource, Dataset};
use crate::table::Row;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct MemoryCollection {
    name: String,
    reference: String,
    fields: Vec<String>,
    records: Vec<Row>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>, reference: impl Into<String>, fields: Vec<String>) -> Self {
        Self { name: name.into(), reference: reference.into(), fields, records: Vec::new() }
    }
    pub fn push(&mut self, record: Row) {
        self.records.push(record);
    }
    pub fn with_record(mut self, record: Row) -> Self {
        self.push(record);
        self
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }
    fn reference(&self) -> &str {
        &self.reference
    }
    fn fields(&self) -> Vec<String> {
        self.fields.clone()
    }
    fn fetch(&self, criterion: &Criterion, attributes: &[String]) -> Result<Vec<Row>> {
        Ok(self
            .records
            .iter()
            .filter(|record| criterion.matches(record))
            .map(|record| {
                attributes
                    .iter()
                    .map(|a| (a.clone(), record.get(a).cloned().unwrap_or(Value::Null)))
                    .collect::<Row>()
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryDataset {
    name: String,
    collections: IndexMap<String, MemoryCollection>,
}

impl MemoryDataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), collections: IndexMap::new() }
    }
    pub fn with_collection(mut self, collection: MemoryCollection) -> Self {
        self.collections.insert(collection.name.clone(), collection);
        self
    }
}

impl Dataset for MemoryDataset {
    fn name(&self) -> &str {
        &self.name
    }
    fn collections(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }
    fn collection(&self, name: &str) -> Result<&dyn Collection> {
        self.collections
            .get(name)
            .map(|c| c as &dyn Collection)
            .ok_or_else(|| PinpointError::UnknownCollection(name.to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    users: HashMap<String, String>,
    datasets: IndexMap<String, MemoryDataset>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }
    pub fn with_dataset(mut self, dataset: MemoryDataset) -> Self {
        self.datasets.insert(dataset.name.clone(), dataset);
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: SourceDocument = serde_json::from_str(text)?;
        let mut source = MemorySource { users: document.users, datasets: IndexMap::new() };
        for (dataset_name, collections) in document.datasets {
            let mut dataset = MemoryDataset::new(dataset_name);
            for (collection_name, collection) in collections {
                dataset = dataset.with_collection(collection.into_collection(collection_name));
            }
            source = source.with_dataset(dataset);
        }
        Ok(source)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PinpointError::Connection(format!("cannot open data source {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }
}

impl DataSource for MemorySource {
    fn connect(&self, credentials: &Credentials, dataset: &str) -> Result<Box<dyn Dataset + '_>> {
        match self.users.get(&credentials.username) {
            Some(password) if *password == credentials.password => (),
            _ => return Err(PinpointError::Authentication { user: credentials.username.clone() }),
        }
        let dataset = self
            .datasets
            .get(dataset)
            .ok_or_else(|| PinpointError::Connection(format!("unknown dataset '{}'", dataset)))?;
        Ok(Box::new(dataset.clone()))
    }
}

#[derive(Deserialize)]
struct SourceDocument {
    #[serde(default)]
    users: HashMap<String, String>,
    #[serde(default)]
    datasets: IndexMap<String, IndexMap<String, CollectionDocument>>,
}

#[derive(Deserialize)]
struct CollectionDocument {
    reference: String,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    records: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl CollectionDocument {
    fn into_collection(self, name: String) -> MemoryCollection {
        let mut fields = self.fields;
        if fields.is_empty() {
            fields.push(self.reference.clone());
            for record in &self.records {
                for key in record.keys() {
                    if !fields.contains(key) {
                        fields.push(key.clone());
                    }
                }
            }
        }
        let mut collection = MemoryCollection::new(name, self.reference, fields);
        for record in self.records {
            collection.push(record.into_iter().map(|(k, v)| (k, Value::from_json(v))).collect());
        }
        collection
    }
}
