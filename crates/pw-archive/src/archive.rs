//! Archive model and JSON parsing.
//!
//! The on-disk form is positional and has no version field, so parsing goes
//! through `serde_json::Value` and checks each element by position: every
//! element but the last is a bucket, the last is the reference value.

use crate::error::{MalformedArchive, Result};
use pw_common::Interval;
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;

/// Offsets of the primes inside one 60-wide bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Bucket(Vec<u64>);

impl Bucket {
    pub fn new(offsets: Vec<u64>) -> Self {
        Bucket(offsets)
    }

    pub fn offsets(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, offset: u64) {
        self.0.push(offset);
    }
}

impl From<Vec<u64>> for Bucket {
    fn from(offsets: Vec<u64>) -> Self {
        Bucket(offsets)
    }
}

/// Trailing reference value of an archive.
///
/// Producers write it either bare or wrapped in a one-element list; both
/// resolve to the same number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceValue {
    /// `rif`
    Scalar(u128),
    /// `[rif]`
    Wrapped(u128),
}

impl ReferenceValue {
    pub fn value(&self) -> u128 {
        match *self {
            ReferenceValue::Scalar(v) | ReferenceValue::Wrapped(v) => v,
        }
    }

    /// Parse the trailing element of an archive.
    pub fn from_value(value: &Value) -> std::result::Result<Self, MalformedArchive> {
        let reference_error = || MalformedArchive::Reference {
            found: describe(value),
        };
        match value {
            Value::Array(items) => match items.as_slice() {
                [inner] => parse_reference_integer(inner)
                    .map(ReferenceValue::Wrapped)
                    .ok_or_else(reference_error),
                _ => Err(reference_error()),
            },
            other => parse_reference_integer(other)
                .map(ReferenceValue::Scalar)
                .ok_or_else(reference_error),
        }
    }
}

impl Serialize for ReferenceValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            ReferenceValue::Scalar(v) => serializer.serialize_u128(v),
            ReferenceValue::Wrapped(v) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(&v)?;
                seq.end()
            }
        }
    }
}

/// Buckets of wheel offsets plus the reference value that anchors them.
///
/// Invariant: at least one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactArchive {
    buckets: Vec<Bucket>,
    reference: ReferenceValue,
}

impl CompactArchive {
    /// Build an archive from parts; fails when `buckets` is empty.
    pub fn new(
        buckets: Vec<Bucket>,
        reference: ReferenceValue,
    ) -> std::result::Result<Self, MalformedArchive> {
        if buckets.is_empty() {
            return Err(MalformedArchive::NoBuckets);
        }
        Ok(CompactArchive { buckets, reference })
    }

    /// Parse an archive from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_value(&value)?)
    }

    /// Parse an archive from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_slice(json.as_bytes())
    }

    /// Interpret an already-parsed JSON value as an archive.
    pub fn from_value(value: &Value) -> std::result::Result<Self, MalformedArchive> {
        let elements = value.as_array().ok_or_else(|| MalformedArchive::NotAList {
            found: describe(value),
        })?;
        let (last, rest) = elements.split_last().ok_or(MalformedArchive::Empty)?;
        let reference = ReferenceValue::from_value(last)?;

        let buckets = rest
            .iter()
            .enumerate()
            .map(|(index, element)| parse_bucket(index, element))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Self::new(buckets, reference)
    }

    /// Serialize back to the positional JSON form.
    pub fn to_json_vec(&self) -> std::result::Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn reference(&self) -> ReferenceValue {
        self.reference
    }

    /// Number of buckets, excluding the reference slot.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of offsets across all buckets.
    pub fn offset_count(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Interval covered by the archive.
    pub fn interval(&self) -> std::result::Result<Interval, MalformedArchive> {
        Interval::from_wheel(self.reference.value(), self.buckets.len())
            .ok_or(MalformedArchive::Overflow {
                bucket: self.buckets.len() - 1,
            })
    }
}

impl Serialize for CompactArchive {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.buckets.len() + 1))?;
        for bucket in &self.buckets {
            seq.serialize_element(bucket)?;
        }
        seq.serialize_element(&self.reference)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for CompactArchive {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        CompactArchive::from_value(&value).map_err(<D::Error as serde::de::Error>::custom)
    }
}

impl JsonSchema for CompactArchive {
    fn schema_name() -> Cow<'static, str> {
        "CompactArchive".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "description": "Buckets of wheel offsets followed by the reference value (bare or wrapped in a one-element list).",
            "type": "array",
            "minItems": 2,
            "items": {
                "anyOf": [
                    { "type": "array", "items": { "type": "integer", "minimum": 0 } },
                    { "type": "integer", "minimum": 0 },
                    { "type": "string", "pattern": "^[0-9]+$" }
                ]
            }
        })
    }
}

fn parse_bucket(index: usize, element: &Value) -> std::result::Result<Bucket, MalformedArchive> {
    let items = element.as_array().ok_or_else(|| MalformedArchive::Bucket {
        bucket: index,
        found: describe(element),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            item.as_u64().ok_or_else(|| MalformedArchive::Offset {
                bucket: index,
                position,
                found: describe(item),
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Bucket)
}

/// Reference values may exceed 64 bits, so they are read from the literal
/// digits. Decimal strings are accepted for producers that cannot emit wide
/// JSON integers.
fn parse_reference_integer(value: &Value) -> Option<u128> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()
        }
        _ => None,
    }
}

/// Short description of a JSON value for error messages.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 24 => {
            let head: String = s.chars().take(24).collect();
            format!("{:?}...", head)
        }
        Value::String(s) => format!("{:?}", s),
        Value::Array(items) => format!("a list of {} elements", items.len()),
        Value::Object(_) => "an object".to_string(),
    }
}
