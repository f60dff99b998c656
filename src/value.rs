// Cell values held by a table
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use std::cmp::Ordering;
use std::fmt;

lazy_static! {
    static ref PYTHON_CONSTANT: Regex = Regex::new(r"\b(True|False|None)\b").unwrap();
}

/// A single field of a row.
///
/// Tables read from text are typed cell by cell, so a column may hold
/// different kinds in different rows. Serializes as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Types a textual cell: empty cells are null, then booleans, integers,
    /// floats, JSON (or Python literal) lists and maps, and finally text.
    pub fn parse_cell(cell: &str) -> Value {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return if f.is_nan() { Value::Null } else { Value::Float(f) };
        }
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            if let Some(structured) = parse_structured(trimmed) {
                return structured;
            }
        }
        Value::Text(trimmed.to_string())
    }

    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Nested lists collapse into one flat list; anything else is returned as is.
    pub fn flatten(&self) -> Value {
        match self {
            Value::List(items) => {
                let mut flat = Vec::with_capacity(items.len());
                flatten_into(items, &mut flat);
                Value::List(flat)
            }
            other => other.clone(),
        }
    }

    /// Equality used by `==` and `!=`. Integers compare exactly, mixed
    /// integers and floats numerically, other kinds never equal each other.
    pub fn equals(&self, other: &Value) -> bool {
        if let (Value::Int(a), Value::Int(b)) = (self, other) {
            return a == b;
        }
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// Ordering used by `<`, `<=`, `>` and `>=`; `None` when the kinds cannot be ordered.
    pub fn order(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }
}

fn flatten_into(items: &[Value], flat: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::List(inner) => flatten_into(inner, flat),
            other => flat.push(other.clone()),
        }
    }
}

fn parse_structured(text: &str) -> Option<Value> {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
        return Some(Value::from_json(json));
    }
    // lists and dicts exported from Python dataframes use repr syntax
    serde_json::from_str::<serde_json::Value>(&python_repr_to_json(text))
        .ok()
        .map(Value::from_json)
}

/// Rewrites Python repr quoting and constants as JSON. String contents are
/// copied untouched apart from quote escaping.
fn python_repr_to_json(text: &str) -> String {
    let mut json = String::with_capacity(text.len());
    let mut plain = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\'' && c != '"' {
            plain.push(c);
            continue;
        }
        json.push_str(&replace_constants(&plain));
        plain.clear();
        json.push('"');
        while let Some(inner) = chars.next() {
            match inner {
                '\\' => match chars.next() {
                    Some('\'') => json.push('\''),
                    Some(escaped) => {
                        json.push('\\');
                        json.push(escaped);
                    }
                    None => json.push('\\'),
                },
                quote if quote == c => break,
                '"' => json.push_str("\\\""),
                other => json.push(other),
            }
        }
        json.push('"');
    }
    json.push_str(&replace_constants(&plain));
    json
}

fn replace_constants(plain: &str) -> String {
    PYTHON_CONSTANT
        .replace_all(plain, |caps: &regex::Captures| match &caps[1] {
            "True" => "true",
            "False" => "false",
            _ => "null",
        })
        .into_owned()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            // Debug keeps the decimal point so the cell reads back as a float
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(_) | Value::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(s.to_string()) }
}
impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(s) }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}
impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Float(x) }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self { Value::List(items.into_iter().map(Into::into).collect()) }
}
