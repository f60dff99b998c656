use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PinpointError, Result};
use crate::table::Row;
use crate::value::Value;

/// Fields every simulation input needs: the DFT parameters and the atomic positions.
pub const MANDATORY_ATTRIBUTES: [&str; 4] = [
    "dft_dict",
    "atomic_positions_x",
    "atomic_positions_y",
    "atomic_positions_z",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractorOptions {
    pub verbose: bool,
    pub mandatory: Vec<String>,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            mandatory: MANDATORY_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Attribute name to value for one resolved row. Mandatory attributes come
/// first, then the extras that were found, in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExtractionRecord {
    fields: IndexMap<String, Value>,
}

impl ExtractionRecord {
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.fields.get(attribute)
    }
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
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
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct Extractor {
    options: ExtractorOptions,
}

impl Extractor {
    pub fn new(options: ExtractorOptions) -> Self {
        Self { options }
    }

    /// Pulls the mandatory attributes and every requested extra present in
    /// `row`. List values are flattened. A missing mandatory attribute is an
    /// error; a missing extra is skipped with a warning.
    pub fn extract(&self, row: &Row, extras: &[String]) -> Result<ExtractionRecord> {
        info!("Extracting default attributes");
        let mut fields = IndexMap::new();
        for attribute in &self.options.mandatory {
            let value = row
                .get(attribute)
                .ok_or_else(|| PinpointError::MissingAttribute(attribute.clone()))?;
            fields.insert(attribute.clone(), value.flatten());
        }
        if !extras.is_empty() {
            info!("Extracting queried attributes");
        }
        for attribute in extras {
            match row.get(attribute) {
                Some(value) => {
                    if self.options.verbose {
                        info!(attribute = %attribute, value = %value, "Extracted attribute");
                    }
                    fields.entry(attribute.clone()).or_insert_with(|| value.flatten());
                }
                None => warn!(attribute = %attribute, "Attribute not found in the dataset"),
            }
        }
        Ok(ExtractionRecord { fields })
    }
}

pub fn extract(row: &Row, extras: &[String], options: &ExtractorOptions) -> Result<ExtractionRecord> {
    Extractor::new(options.clone()).extract(row, extras)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new()
            .with("temperature", 350i64)
            .with("dft_dict", Value::parse_cell("{'hgrids': 0.4, 'ixc': 'PBE'}"))
            .with("atomic_positions_x", vec![Value::from(vec![0.0, 1.5])])
            .with("atomic_positions_y", vec![0.0, 0.0])
            .with("atomic_positions_z", vec![0.0, 0.7])
    }

    #[test]
    fn mandatory_first_then_extras_in_order() {
        let extras = vec!["temperature".to_string(), "dft_dict".to_string()];
        let record = extract(&row(), &extras, &ExtractorOptions::default()).expect("extracted");
        let keys: Vec<&str> = record.attributes().collect();
        assert_eq!(
            keys,
            vec!["dft_dict", "atomic_positions_x", "atomic_positions_y", "atomic_positions_z", "temperature"]
        );
        assert_eq!(record.get("atomic_positions_x"), Some(&Value::from(vec![0.0, 1.5])));
    }

    #[test]
    fn missing_mandatory_is_an_error() {
        let options = ExtractorOptions { verbose: false, mandatory: vec!["cell".to_string()] };
        let err = extract(&row(), &[], &options).unwrap_err();
        assert!(matches!(err, PinpointError::MissingAttribute(a) if a == "cell"));
    }

    #[test]
    fn serializes_as_indented_json() {
        let record = extract(&row(), &["temperature".to_string()], &ExtractorOptions::default()).expect("ok");
        let json = record.to_json_pretty().expect("json");
        assert!(json.contains("\n  \"temperature\": 350"));
        assert!(json.contains("\"ixc\": \"PBE\""));
    }
}
