//! Record normalizer for bulk import.
//!
//! Maps spreadsheet rows with inconsistent header casing and optional
//! columns into fully populated [`Novel`] records. Missing or malformed
//! cells become field defaults; only a row that is not key/value pairs
//! at all is an error.

use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::{
    DetailField, FieldKind, FieldPath, FieldValue, Novel, NovelField, OpinionField,
};
use crate::pipeline::coerce;

/// Default for short string fields nobody filled in.
pub const NOT_AVAILABLE: &str = "N/A";

/// Expected spreadsheet column header for a field.
pub fn column_header(path: FieldPath) -> &'static str {
    match path {
        FieldPath::Novel(f) => match f {
            NovelField::Name => "Name",
            NovelField::OriginalName => "Original Name",
            NovelField::Genre => "Genre",
            NovelField::Link => "Link",
        },
        FieldPath::Detail(f) => match f {
            DetailField::Description => "Description",
            DetailField::McName => "MC Name",
            DetailField::Tags => "Tags",
            DetailField::SpecialCharacteristicOfMc => "Special Characteristic of MC",
            DetailField::Status => "Status",
            DetailField::TotalChapters => "Total Chapters",
            DetailField::NovelCover => "Novel Cover",
        },
        FieldPath::Opinion(f) => match f {
            OpinionField::Rating => "Rating",
            OpinionField::ChaptersRead => "Chapters Read",
            OpinionField::Favorite => "Favorite",
            OpinionField::WorthToContinue => "Worth to Continue",
            OpinionField::Comments => "Comments",
        },
    }
}

/// Value a field takes when its column is missing or unusable.
pub fn default_value(kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Text => FieldValue::Text(NOT_AVAILABLE.to_string()),
        FieldKind::FreeText => FieldValue::Text(String::new()),
        FieldKind::Count => FieldValue::Count(Some(0)),
        FieldKind::Rating => FieldValue::Rating(0),
        FieldKind::Flag => FieldValue::Flag(false),
        FieldKind::Status => FieldValue::Status(None),
    }
}

/// Find a cell by header: exact spelling, then lowercase, then uppercase.
fn resolve<'a>(row: &'a Map<String, Value>, header: &str) -> Option<&'a Value> {
    [header.to_string(), header.to_lowercase(), header.to_uppercase()]
        .iter()
        .filter_map(|key| row.get(key))
        .find(|value| !coerce::is_absent(value))
}

/// Normalize one raw record into a canonical novel.
pub fn normalize(raw: &Value) -> Result<Novel> {
    let row = raw.as_object().ok_or_else(|| {
        AppError::input_shape(format!("expected an object of columns, got {}", type_name(raw)))
    })?;

    let mut novel = Novel::default();
    for path in FieldPath::all() {
        let kind = path.kind();
        let value = resolve(row, column_header(path))
            .and_then(|cell| coerce::lenient(kind, cell))
            .unwrap_or_else(|| default_value(kind));
        novel.set(path, value)?;
    }

    log::debug!("Normalized row into '{}'", novel.name);
    Ok(novel)
}

/// Normalize a batch of raw records.
pub fn normalize_all(raw: &[Value]) -> Result<Vec<Novel>> {
    if raw.is_empty() {
        return Err(AppError::EmptyBatch);
    }

    raw.iter()
        .enumerate()
        .map(|(index, row)| {
            normalize(row).map_err(|e| match e {
                AppError::InvalidInputShape(msg) => {
                    AppError::input_shape(format!("row {}: {}", index + 1, msg))
                }
                other => other,
            })
        })
        .collect()
}

/// Normalize a whole document, which must be a JSON array of rows.
pub fn normalize_rows(doc: &Value) -> Result<Vec<Novel>> {
    match doc {
        Value::Array(rows) => normalize_all(rows),
        other => Err(AppError::input_shape(format!(
            "expected an array of rows, got {}",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NovelStatus;
    use serde_json::json;

    #[test]
    fn test_empty_row_gets_all_defaults() {
        let novel = normalize(&json!({})).unwrap();

        assert_eq!(novel.id, None);
        assert_eq!(novel.name, "N/A");
        assert_eq!(novel.original_name, "N/A");
        assert_eq!(novel.genre, "N/A");
        assert_eq!(novel.link, "N/A");
        assert_eq!(novel.detail.description, "");
        assert_eq!(novel.detail.mc_name, "N/A");
        assert_eq!(novel.detail.tags, "N/A");
        assert_eq!(novel.detail.special_characteristic_of_mc, "N/A");
        assert_eq!(novel.detail.status, None);
        assert_eq!(novel.detail.total_chapters, Some(0));
        assert_eq!(novel.detail.novel_cover, "N/A");
        assert_eq!(novel.opinion.rating, 0);
        assert_eq!(novel.opinion.chapters_read, 0);
        assert!(!novel.opinion.favorite);
        assert!(!novel.opinion.worth_to_continue);
        assert_eq!(novel.opinion.comments, "");
    }

    #[test]
    fn test_header_spellings_resolve_identically() {
        for row in [
            json!({ "Genre": "Xianxia" }),
            json!({ "genre": "Xianxia" }),
            json!({ "GENRE": "Xianxia" }),
        ] {
            assert_eq!(normalize(&row).unwrap().genre, "Xianxia");
        }
    }

    #[test]
    fn test_exact_spelling_wins() {
        let row = json!({ "NAME": "Upper", "name": "Lower", "Name": "Exact" });
        assert_eq!(normalize(&row).unwrap().name, "Exact");

        let row = json!({ "NAME": "Upper", "name": "Lower" });
        assert_eq!(normalize(&row).unwrap().name, "Lower");
    }

    #[test]
    fn test_blank_cell_falls_through_to_next_spelling() {
        let row = json!({ "Name": "", "name": null, "NAME": "Shouted" });
        assert_eq!(normalize(&row).unwrap().name, "Shouted");
    }

    #[test]
    fn test_full_row() {
        let row = json!({
            "Name": "Lord of the Mysteries",
            "Original Name": "诡秘之主",
            "Genre": "Mystery",
            "Link": "https://example.com/lotm",
            "description": "Steam and occult",
            "MC NAME": "Klein Moretti",
            "Tags": "steampunk, occult",
            "Special Characteristic of MC": "Seer",
            "Status": "completed",
            "Total Chapters": "1430",
            "Novel Cover": "https://example.com/lotm.jpg",
            "Rating": 10,
            "Chapters Read": 1430.0,
            "Favorite": "yes",
            "Worth to Continue": true,
            "Comments": "Masterpiece"
        });

        let novel = normalize(&row).unwrap();
        assert_eq!(novel.original_name, "诡秘之主");
        assert_eq!(novel.detail.mc_name, "Klein Moretti");
        assert_eq!(novel.detail.status, Some(NovelStatus::Completed));
        assert_eq!(novel.detail.total_chapters, Some(1430));
        assert_eq!(novel.opinion.rating, 10);
        assert_eq!(novel.opinion.chapters_read, 1430);
        assert!(novel.opinion.favorite);
        assert!(novel.opinion.worth_to_continue);
        assert_eq!(novel.opinion.comments, "Masterpiece");
    }

    #[test]
    fn test_malformed_cells_become_defaults() {
        let row = json!({ "Rating": "superb", "Total Chapters": [1, 2], "Status": "binged" });
        let novel = normalize(&row).unwrap();
        assert_eq!(novel.opinion.rating, 0);
        assert_eq!(novel.detail.total_chapters, Some(0));
        assert_eq!(novel.detail.status, None);
    }

    #[test]
    fn test_non_object_is_invalid_shape() {
        for raw in [json!("Alpha"), json!(3), json!(null), json!([{"Name": "A"}])] {
            assert!(matches!(
                normalize(&raw),
                Err(AppError::InvalidInputShape(_))
            ));
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(matches!(normalize_all(&[]), Err(AppError::EmptyBatch)));
        assert!(matches!(normalize_rows(&json!([])), Err(AppError::EmptyBatch)));
    }

    #[test]
    fn test_batch_names_failing_row() {
        let rows = vec![json!({ "Name": "A" }), json!("oops")];
        match normalize_all(&rows) {
            Err(AppError::InvalidInputShape(msg)) => assert!(msg.starts_with("row 2:")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rows_document_must_be_array() {
        assert!(matches!(
            normalize_rows(&json!({ "Name": "A" })),
            Err(AppError::InvalidInputShape(_))
        ));
        assert_eq!(normalize_rows(&json!([{ "name": "A" }])).unwrap()[0].name, "A");
    }
}
