//! Edit reconciliation for single-record updates.
//!
//! Computes which proposed edits actually differ from the stored novel and
//! assembles the partial update for `PATCH /novels/{id}`.
//!
//! The store replaces `detail` and `opinion` wholesale, so a patch touching
//! any field of a sub-structure carries a full copy of it.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::{Detail, FieldPath, Novel, NovelField, Opinion, OpinionField};
use crate::pipeline::coerce;

/// Fields whose proposed value differs from the original.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    entries: Vec<(FieldPath, Value)>,
}

impl ChangeSet {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Get the number of changed fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Changed fields keyed by their denamespaced name.
    pub fn changed(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(path, value)| (path.field_name().to_string(), value.clone()))
            .collect()
    }

    /// Changed fields keyed by their namespaced edit key.
    pub fn changed_keys(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(path, value)| (path.key(), value.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldPath, &Value)> {
        self.entries.iter().map(|(path, value)| (*path, value))
    }

    pub fn get(&self, path: FieldPath) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, value)| value)
    }

    /// Turn an empty change set into [`AppError::NoChanges`].
    pub fn require_changes(self) -> Result<Self> {
        if self.has_changes() {
            Ok(self)
        } else {
            Err(AppError::NoChanges)
        }
    }
}

/// Partial novel sent to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Full replacement detail, present only if a detail field changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Detail>,

    /// Full replacement opinion, present only if an opinion field changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opinion: Option<Opinion>,
}

impl NovelPatch {
    pub fn is_empty(&self) -> bool {
        self == &NovelPatch::default()
    }

    /// Shallow-merge a confirmed patch into local state.
    pub fn apply_to(&self, novel: &mut Novel) {
        let top_level = [
            (&self.name, &mut novel.name),
            (&self.original_name, &mut novel.original_name),
            (&self.genre, &mut novel.genre),
            (&self.link, &mut novel.link),
        ];
        for (patched, slot) in top_level {
            if let Some(value) = patched {
                *slot = value.clone();
            }
        }
        if let Some(detail) = &self.detail {
            novel.detail = detail.clone();
        }
        if let Some(opinion) = &self.opinion {
            novel.opinion = opinion.clone();
        }
    }
}

/// Original value as the comparison sees it.
///
/// Unset fields read as `""`, except the rating, which reads as `0`.
fn resolved_original(original: &Novel, path: FieldPath) -> Value {
    match original.get(path).to_json() {
        Value::Null if path == FieldPath::Opinion(OpinionField::Rating) => Value::from(0),
        Value::Null => Value::String(String::new()),
        value => value,
    }
}

/// `null`, `""`, `0` and `false` all compare equal to each other.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(b) => !b,
        _ => false,
    }
}

fn values_equal(original: &Value, proposed: &Value) -> bool {
    if is_blank(original) && is_blank(proposed) {
        return true;
    }
    match (original, proposed) {
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => coerce::text_of(a) == coerce::text_of(b),
    }
}

/// Compute which proposed edits differ from the original novel.
pub fn compute_changes(original: &Novel, edits: &Map<String, Value>) -> Result<ChangeSet> {
    let mut entries = Vec::new();

    for (key, proposed) in edits {
        let path = FieldPath::classify(key)?;
        let current = resolved_original(original, path);

        if values_equal(&current, proposed) {
            continue;
        }
        log::debug!("Field {} changed: {} -> {}", path, current, proposed);
        entries.push((path, proposed.clone()));
    }

    Ok(ChangeSet { entries })
}

/// Assemble the partial update for a change set.
pub fn build_patch(original: &Novel, changes: &ChangeSet) -> Result<NovelPatch> {
    let mut updated = original.clone();
    let mut patch = NovelPatch::default();
    let mut touched_detail = false;
    let mut touched_opinion = false;

    for (path, proposed) in changes.iter() {
        let value = coerce::strict(path.kind(), proposed)
            .map_err(|message| AppError::field_value(path.key(), message))?;
        updated.set(path, value)?;

        match path {
            FieldPath::Novel(field) => {
                let text = match field {
                    NovelField::Name => &updated.name,
                    NovelField::OriginalName => &updated.original_name,
                    NovelField::Genre => &updated.genre,
                    NovelField::Link => &updated.link,
                }
                .clone();
                let slot = match field {
                    NovelField::Name => &mut patch.name,
                    NovelField::OriginalName => &mut patch.original_name,
                    NovelField::Genre => &mut patch.genre,
                    NovelField::Link => &mut patch.link,
                };
                *slot = Some(text);
            }
            FieldPath::Detail(_) => touched_detail = true,
            FieldPath::Opinion(_) => touched_opinion = true,
        }
    }

    if touched_detail {
        patch.detail = Some(updated.detail);
    }
    if touched_opinion {
        patch.opinion = Some(updated.opinion);
    }
    Ok(patch)
}
