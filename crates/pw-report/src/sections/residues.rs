//! Residue distribution modulo 60.
//!
//! Serialized as a JSON object keyed by the residue in decimal, with all 16
//! wheel residues always present.

use pw_common::{residue_index, WHEEL_MODULUS, WHEEL_RESIDUES};
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Count of primes per wheel residue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResidueDistribution {
    counts: [u64; 16],
}

impl ResidueDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `value` under its residue. Values off the wheel are ignored and
    /// return `false`.
    pub fn record(&mut self, value: u128) -> bool {
        match residue_index(value % WHEEL_MODULUS) {
            Some(index) => {
                self.counts[index] = self.counts[index].saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Count for `residue`, or `None` if it is not a wheel residue.
    pub fn count(&self, residue: u8) -> Option<u64> {
        residue_index(u128::from(residue)).map(|i| self.counts[i])
    }

    /// `(residue, count)` in ascending residue order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        WHEEL_RESIDUES.iter().copied().zip(self.counts.iter().copied())
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    /// Share of `residue` in percent of the total, 0 when empty.
    pub fn percentage(&self, residue: u8) -> f64 {
        let total = self.total();
        match self.count(residue) {
            Some(count) if total > 0 => count as f64 / total as f64 * 100.0,
            _ => 0.0,
        }
    }
}

impl Serialize for ResidueDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WHEEL_RESIDUES.len()))?;
        for (residue, count) in self.iter() {
            map.serialize_entry(&residue.to_string(), &count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResidueDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DistributionVisitor)
    }
}

struct DistributionVisitor;

impl<'de> Visitor<'de> for DistributionVisitor {
    type Value = ResidueDistribution;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with one count per wheel residue")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut counts = [None::<u64>; 16];
        while let Some(key) = access.next_key::<String>()? {
            let index = key
                .parse::<u128>()
                .ok()
                .and_then(residue_index)
                .ok_or_else(|| de::Error::custom(format!("'{}' is not a wheel residue", key)))?;
            if counts[index].is_some() {
                return Err(de::Error::custom(format!("duplicate residue '{}'", key)));
            }
            counts[index] = Some(access.next_value()?);
        }

        let mut distribution = ResidueDistribution::default();
        for (index, count) in counts.iter().enumerate() {
            distribution.counts[index] = count.ok_or_else(|| {
                de::Error::custom(format!("missing residue '{}'", WHEEL_RESIDUES[index]))
            })?;
        }
        Ok(distribution)
    }
}

impl JsonSchema for ResidueDistribution {
    fn schema_name() -> Cow<'static, str> {
        "ResidueDistribution".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        let keys: Vec<String> = WHEEL_RESIDUES.iter().map(|r| r.to_string()).collect();
        let properties: serde_json::Map<String, serde_json::Value> = keys
            .iter()
            .map(|k| (k.clone(), serde_json::json!({ "type": "integer", "minimum": 0 })))
            .collect();
        json_schema!({
            "description": "Prime count per residue modulo 60; every wheel residue is present.",
            "type": "object",
            "properties": properties,
            "required": keys,
            "additionalProperties": false
        })
    }
}
