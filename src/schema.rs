use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::error::{AvatrError, AvatrResult};

/// Number of part slots in every avatar.
pub const PART_COUNT: usize = 13;

/// Closed set of palette slot names referenced by part style classes.
pub const PALETTE_SLOTS: [&str; 10] = [
    "flesh", "flesh2", "flesh3", "hair", "hair2", "eye", "p1", "p2", "p3", "p4",
];

/// One palette assignment: a slot name from [`PALETTE_SLOTS`] and a lowercase
/// `#rrggbb` color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub slot: String,
    pub color: String,
}

/// A client request that passed validation but has no storage key yet.
///
/// Palette entries keep the order in which the client sent them; style rules
/// are later emitted in that order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarRequest {
    pub parts: Vec<u32>,
    pub palette: Vec<PaletteEntry>,
}

/// A validated unit of work: part selection, palette, and the minted storage
/// key the rendered PNG will be written under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub parts: Vec<u32>,
    pub palette: Vec<PaletteEntry>,
    pub key: String,
}

impl AvatarRequest {
    /// Parse and validate a raw JSON request body.
    pub fn from_slice(raw: &[u8]) -> AvatrResult<Self> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| AvatrError::validation(format!("request body is not valid JSON: {e}")))?;
        Self::from_value(&value)
    }

    /// Validate a decoded request body.
    ///
    /// Every rule is a hard rejection; there are no partial results. The
    /// allowed palette-name set is never mutated: duplicates are caught with a
    /// separate seen-set.
    pub fn from_value(value: &Value) -> AvatrResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| AvatrError::validation("request body is not an object"))?;

        let parts_value = obj
            .get("parts")
            .filter(|v| !v.is_null())
            .ok_or_else(|| AvatrError::validation("request is missing `parts`"))?;
        let palette_value = obj
            .get("palette")
            .filter(|v| !v.is_null())
            .ok_or_else(|| AvatrError::validation("request is missing `palette`"))?;

        let parts_raw = parts_value
            .as_array()
            .ok_or_else(|| AvatrError::validation("`parts` is not an array"))?;
        if parts_raw.len() != PART_COUNT {
            return Err(AvatrError::validation(format!(
                "`parts` has {} elements, expected {PART_COUNT}",
                parts_raw.len()
            )));
        }

        let mut parts = Vec::with_capacity(PART_COUNT);
        for (i, elem) in parts_raw.iter().enumerate() {
            let index = as_strict_index(elem).ok_or_else(|| {
                AvatrError::validation(format!("`parts[{i}]` is not a non-negative integer"))
            })?;
            parts.push(index);
        }

        let palette_raw = palette_value
            .as_object()
            .ok_or_else(|| AvatrError::validation("`palette` is not an object"))?;

        let mut seen = HashSet::new();
        let mut palette = Vec::with_capacity(palette_raw.len());
        for (name, color) in palette_raw {
            if !PALETTE_SLOTS.contains(&name.as_str()) {
                return Err(AvatrError::validation(format!(
                    "unknown palette slot `{name}`"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(AvatrError::validation(format!(
                    "duplicate palette slot `{name}`"
                )));
            }
            let color = color
                .as_str()
                .filter(|s| is_color(s))
                .ok_or_else(|| {
                    AvatrError::validation(format!("palette slot `{name}` has an invalid color"))
                })?;
            palette.push(PaletteEntry {
                slot: name.clone(),
                color: color.to_string(),
            });
        }

        Ok(Self { parts, palette })
    }

    /// Attach a minted storage key, producing a dispatchable job.
    pub fn into_job(self, key: String) -> JobRequest {
        JobRequest {
            parts: self.parts,
            palette: self.palette,
            key,
        }
    }
}

/// Strict integer predicate for part indices.
///
/// Accepts JSON integer literals and floats with a zero fractional part, as
/// long as the value fits in `u32`. Anything else (strings, negative numbers,
/// true fractions, non-finite floats) is rejected.
fn as_strict_index(value: &Value) -> Option<u32> {
    let number = value.as_number()?;
    if let Some(u) = number.as_u64() {
        return u32::try_from(u).ok();
    }
    let f = number.as_f64()?;
    if f.is_finite() && f >= 0.0 && f <= f64::from(u32::MAX) && f.fract() == 0.0 {
        return Some(f as u32);
    }
    None
}

/// Exact match for `^#[0-9a-f]{6}$` (lowercase only).
fn is_color(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 7
        && b[0] == b'#'
        && b[1..]
            .iter()
            .all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
#[path = "../tests/unit/schema.rs"]
mod tests;
