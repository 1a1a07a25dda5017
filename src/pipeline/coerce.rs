//! Value coercion from loosely typed JSON into [`FieldValue`]s.
//!
//! Two flavours: [`lenient`] for spreadsheet rows, where anything that does
//! not parse falls back to the field default, and [`strict`] for user edits,
//! where a bad value is reported instead of silently replaced.

use serde_json::Value;

use crate::models::{FieldKind, FieldValue, MAX_RATING, NovelStatus};

/// Whether a raw cell counts as "not provided".
///
/// Spreadsheet converters emit `null` or blank strings for empty cells.
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Textual form used for string fields and string comparison.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerce a spreadsheet cell. `None` means "use the default".
pub fn lenient(kind: FieldKind, value: &Value) -> Option<FieldValue> {
    if is_absent(value) {
        return None;
    }

    match kind {
        FieldKind::Text | FieldKind::FreeText => match value {
            Value::String(s) => Some(FieldValue::Text(s.trim().to_string())),
            Value::Number(_) | Value::Bool(_) => Some(FieldValue::Text(value.to_string())),
            _ => None,
        },
        FieldKind::Count => loose_count(value).map(|n| FieldValue::Count(Some(n))),
        FieldKind::Rating => {
            loose_count(value).map(|n| FieldValue::Rating(n.min(MAX_RATING as u32) as u8))
        }
        FieldKind::Flag => parse_flag(value).map(FieldValue::Flag),
        FieldKind::Status => match value {
            Value::String(s) => NovelStatus::from_label(s).map(|s| FieldValue::Status(Some(s))),
            _ => None,
        },
    }
}

/// Coerce a proposed edit value, rejecting anything that does not fit.
pub fn strict(kind: FieldKind, value: &Value) -> Result<FieldValue, String> {
    match kind {
        FieldKind::Text | FieldKind::FreeText => match value {
            Value::Array(_) | Value::Object(_) => Err(format!("expected {}, got {}", kind, value)),
            other => Ok(FieldValue::Text(text_of(other))),
        },
        FieldKind::Count => {
            if is_absent(value) {
                return Ok(FieldValue::Count(None));
            }
            exact_count(value)
                .map(|n| FieldValue::Count(Some(n)))
                .ok_or_else(|| format!("expected {}, got {}", kind, value))
        }
        FieldKind::Rating => {
            if is_absent(value) {
                return Ok(FieldValue::Rating(0));
            }
            match exact_count(value) {
                Some(n) if n <= MAX_RATING as u32 => Ok(FieldValue::Rating(n as u8)),
                _ => Err(format!("expected {}, got {}", kind, value)),
            }
        }
        FieldKind::Flag => {
            if is_absent(value) {
                return Ok(FieldValue::Flag(false));
            }
            parse_flag(value)
                .map(FieldValue::Flag)
                .ok_or_else(|| format!("expected {}, got {}", kind, value))
        }
        FieldKind::Status => {
            if is_absent(value) {
                return Ok(FieldValue::Status(None));
            }
            let label = text_of(value);
            NovelStatus::from_label(&label)
                .map(|s| FieldValue::Status(Some(s)))
                .ok_or_else(|| {
                    let known: Vec<&str> = NovelStatus::ALL.iter().map(|s| s.as_str()).collect();
                    format!("unknown status '{}', expected one of {}", label, known.join(", "))
                })
        }
    }
}

/// Integer from a number or numeric string; floats truncate, negatives clamp to 0.
pub(crate) fn loose_count(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.clamp(0.0, u32::MAX as f64) as u32)
}

/// Whole, non-negative integer from a number or numeric string.
fn exact_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
