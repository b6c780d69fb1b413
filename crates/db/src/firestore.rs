//! Firestore REST document representation.
//!
//! Documents arrive from the REST API (and from document trigger envelopes)
//! with every field wrapped in a typed union such as `{"stringValue": "x"}`.
//! This module converts between that form and plain JSON so the models can
//! be deserialized with serde as usual.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid integerValue '{0}'")]
    InvalidInteger(String),
    #[error("document field does not fit the model: {0}")]
    Shape(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name: `projects/{p}/databases/{db}/documents/{path}`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(NullValue),
    BooleanValue(bool),
    /// int64 encoded as a decimal string.
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    /// base64.
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullValue {
    #[serde(rename = "NULL_VALUE")]
    NullValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    /// Plain JSON view. Timestamps, bytes and references become strings,
    /// geo points become `{latitude, longitude}` objects.
    pub fn into_json(self) -> Result<Json, CodecError> {
        let json = match self {
            Value::NullValue(_) => Json::Null,
            Value::BooleanValue(b) => Json::Bool(b),
            Value::IntegerValue(raw) => {
                let n: i64 = raw
                    .parse()
                    .map_err(|_| CodecError::InvalidInteger(raw.clone()))?;
                Json::Number(n.into())
            }
            Value::DoubleValue(d) => Number::from_f64(d).map_or(Json::Null, Json::Number),
            Value::TimestampValue(s)
            | Value::StringValue(s)
            | Value::BytesValue(s)
            | Value::ReferenceValue(s) => Json::String(s),
            Value::GeoPointValue(p) => serde_json::json!({
                "latitude": p.latitude,
                "longitude": p.longitude,
            }),
            Value::ArrayValue(a) => Json::Array(
                a.values
                    .into_iter()
                    .map(Value::into_json)
                    .collect::<Result<_, _>>()?,
            ),
            Value::MapValue(m) => fields_into_json(m.fields)?,
        };
        Ok(json)
    }

    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => Value::NullValue(NullValue::NullValue),
            Json::Bool(b) => Value::BooleanValue(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::IntegerValue(i.to_string()),
                None => Value::DoubleValue(n.as_f64().unwrap_or_default()),
            },
            Json::String(s) => Value::StringValue(s.clone()),
            Json::Array(items) => Value::ArrayValue(ArrayValue {
                values: items.iter().map(Value::from_json).collect(),
            }),
            Json::Object(map) => Value::MapValue(MapValue {
                fields: fields_from_json(map),
            }),
        }
    }
}

fn fields_into_json(fields: BTreeMap<String, Value>) -> Result<Json, CodecError> {
    let mut out = Map::with_capacity(fields.len());
    for (key, value) in fields {
        out.insert(key, value.into_json()?);
    }
    Ok(Json::Object(out))
}

fn fields_from_json(map: &Map<String, Json>) -> BTreeMap<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), Value::from_json(v)))
        .collect()
}

impl Document {
    /// Builds a document from a plain JSON object. Non-object values produce
    /// a document without fields.
    pub fn from_json(name: impl Into<String>, json: &Json) -> Self {
        let fields = match json {
            Json::Object(map) => fields_from_json(map),
            _ => BTreeMap::new(),
        };
        Self {
            name: name.into(),
            fields,
            create_time: None,
            update_time: None,
        }
    }

    pub fn into_json(self) -> Result<Json, CodecError> {
        fields_into_json(self.fields)
    }

    /// Decodes the fields straight into a model.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, CodecError> {
        Ok(serde_json::from_value(self.into_json()?)?)
    }

    /// Path relative to the database root, e.g. `chats/c1/messages/m1`.
    /// Names that are already relative are returned unchanged.
    pub fn relative_path(&self) -> &str {
        match self.name.split_once("/documents/") {
            Some((_, path)) => path,
            None => self.name.trim_start_matches('/'),
        }
    }

    /// Last path segment.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    pub fn exists(&self) -> bool {
        !self.name.is_empty()
    }
}
