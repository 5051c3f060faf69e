//! Query string construction for list and filter endpoints.
//!
//! Parameters keep insertion order. `Null` values are dropped from the
//! output entirely instead of being written as `key=`.

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("query parameters could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("query parameters must be a flat map of named fields")]
    NotAMap,
    #[error("query parameter `{key}` is not a scalar value")]
    Unsupported { key: String },
}

/// A single query value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
}

impl QueryValue {
    /// String form of the value, `None` for `Null`.
    pub fn render(&self) -> Option<String> {
        match self {
            QueryValue::Str(s) => Some(s.clone()),
            QueryValue::Int(n) => Some(n.to_string()),
            QueryValue::UInt(n) => Some(n.to_string()),
            QueryValue::Float(n) => Some(n.to_string()),
            QueryValue::Bool(b) => Some(b.to_string()),
            QueryValue::Null => None,
        }
    }

    fn from_json(key: &str, value: Value) -> Result<Self, QueryError> {
        match value {
            Value::Null => Ok(QueryValue::Null),
            Value::Bool(b) => Ok(QueryValue::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(QueryValue::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(QueryValue::UInt(u))
                } else {
                    Ok(n.as_f64().map_or(QueryValue::Null, QueryValue::Float))
                }
            }
            Value::String(s) => Ok(QueryValue::Str(s)),
            Value::Array(_) | Value::Object(_) => Err(QueryError::Unsupported {
                key: key.to_string(),
            }),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Str(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Str(v)
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<i32> for QueryValue {
    fn from(v: i32) -> Self {
        QueryValue::Int(i64::from(v))
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        QueryValue::UInt(u64::from(v))
    }
}

impl From<u64> for QueryValue {
    fn from(v: u64) -> Self {
        QueryValue::UInt(v)
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        QueryValue::Float(v)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(QueryValue::Null, Into::into)
    }
}

/// Ordered mapping of query parameter names to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds parameters from a flat serializable struct, in field order.
    ///
    /// A unit struct (serialized as `null`) yields an empty mapping.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, QueryError> {
        match serde_json::to_value(value)? {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => {
                let mut params = Self::new();
                for (key, value) in map {
                    let value = QueryValue::from_json(&key, value)?;
                    params.push(key, value);
                }
                Ok(params)
            }
            _ => Err(QueryError::NotAMap),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Inserts a parameter. Re-inserting a key replaces its value in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of parameters including null ones.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Renders `k1=v1&k2=v2`, skipping null values.
    pub fn serialize(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            if let Some(rendered) = value.render() {
                out.append_pair(key, &rendered);
            }
        }
        out.finish()
    }

    /// Appends `?query` to `path` only when there is something to append.
    pub fn append_to(&self, path: &str) -> String {
        let query = self.serialize();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        }
    }
}
