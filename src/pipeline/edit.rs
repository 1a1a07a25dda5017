// src/pipeline/edit.rs

//! Single-record edit: load, reconcile, patch, merge.

use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::{Novel, NovelId};
use crate::pipeline::reconcile::{NovelPatch, build_patch, compute_changes};
use crate::services::NovelStore;

/// What an edit run ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Every proposed value matched the stored one; nothing was sent
    Unchanged(Novel),
    /// The store accepted the patch
    Updated {
        novel: Novel,
        patch: NovelPatch,
        changed: Map<String, Value>,
    },
}

impl EditOutcome {
    pub fn novel(&self) -> &Novel {
        match self {
            EditOutcome::Unchanged(novel) => novel,
            EditOutcome::Updated { novel, .. } => novel,
        }
    }
}

/// Parse `KEY=VALUE` pairs into an edit map.
///
/// VALUE is read as JSON when it parses (`9`, `true`, `"quoted"`), else as a
/// plain string.
pub fn parse_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Map<String, Value>> {
    let mut edits = Map::new();
    for raw in assignments {
        let raw = raw.as_ref();
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| AppError::validation(format!("expected KEY=VALUE, got '{}'", raw)))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::validation(format!("missing key in '{}'", raw)));
        }
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        edits.insert(key.to_string(), value);
    }
    Ok(edits)
}

/// Load a novel, apply edits through the reconciler and submit the patch.
pub async fn run_edit(
    store: &dyn NovelStore,
    id: &NovelId,
    edits: &Map<String, Value>,
) -> Result<EditOutcome> {
    let mut original = store.get(id).await?;

    let changes = match compute_changes(&original, edits)?.require_changes() {
        Ok(changes) => changes,
        Err(e) if e.is_no_changes() => {
            log::info!("No changes for {}, nothing to submit", original.label());
            return Ok(EditOutcome::Unchanged(original));
        }
        Err(e) => return Err(e),
    };

    let patch = build_patch(&original, &changes)?;
    log::info!(
        "Submitting {} changed field(s) for {}",
        changes.len(),
        original.label()
    );
    let confirmed = store.update(id, &patch).await?;

    // Merge locally; the store only contributes its write timestamp.
    patch.apply_to(&mut original);
    if confirmed.detail.last_updated_on.is_some() {
        original.detail.last_updated_on = confirmed.detail.last_updated_on;
    }

    Ok(EditOutcome::Updated {
        novel: original,
        patch,
        changed: changes.changed(),
    })
}
