//! Shared traits and serde helpers for the wire shapes exchanged with the
//! quoting service.

use std::collections::BTreeMap;

use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

/// Exposes the natural key every catalog record is addressed by.
pub trait CatalogEntry {
    fn name(&self) -> &str;
}

/// Finds an entry by exact name.
pub fn find_by_name<'a, T: CatalogEntry>(entries: &'a [T], name: &str) -> Option<&'a T> {
    entries.iter().find(|entry| entry.name() == name)
}

/// Finds an entry by name, ignoring ASCII case and surrounding whitespace.
pub fn find_by_name_loose<'a, T: CatalogEntry>(entries: &'a [T], name: &str) -> Option<&'a T> {
    let needle = name.trim();
    find_by_name(entries, needle).or_else(|| {
        entries
            .iter()
            .find(|entry| entry.name().eq_ignore_ascii_case(needle))
    })
}

/// Reads an optional millimetre dimension. Integral floats are accepted since
/// some persisted records were written by a float-typed backend.
pub fn deserialize_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => {
            if let Some(int) = number.as_u64() {
                u32::try_from(int)
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("dimension out of range: {int}")))
            } else if let Some(float) = number.as_f64() {
                if float >= 0.0 && float.fract() == 0.0 && float <= u32::MAX as f64 {
                    Ok(Some(float as u32))
                } else {
                    Err(D::Error::custom(format!("invalid dimension: {float}")))
                }
            } else {
                Err(D::Error::custom(format!("invalid dimension: {number}")))
            }
        }
        Some(other) => Err(D::Error::custom(format!(
            "dimension must be a number, got {other}"
        ))),
    }
}

/// Reads an accessory quantity map, dropping zero entries. `null` reads as an
/// empty map.
pub fn deserialize_accessories<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, u32>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter(|(_, quantity)| *quantity > 0)
        .collect())
}

/// Treats a blank string the same as an absent value.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }))
}

/// Reads a line quantity. Missing, null or zero quantities count as one unit.
pub fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<u32>::deserialize(deserializer)?;
    Ok(raw.filter(|quantity| *quantity > 0).unwrap_or(1))
}

pub(crate) fn default_quantity() -> u32 {
    1
}
