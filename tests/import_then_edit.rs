//! End-to-end over the public API: normalize a sheet, then reconcile edits.

use novel_tracker::error::AppError;
use novel_tracker::models::{FieldPath, Novel, NovelId, NovelStatus};
use novel_tracker::pipeline::{build_patch, compute_changes, normalize_rows};
use serde_json::{Map, Value, json};

fn edits(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn imported() -> Novel {
    let rows = json!([{
        "Name": "Alpha",
        "genre": "Fantasy",
        "STATUS": "Reading",
        "Total Chapters": 10,
        "MC Name": "Lin",
        "Tags": "system, cultivation"
    }]);
    let mut novel = normalize_rows(&rows).unwrap().remove(0);
    novel.id = Some(NovelId::Number(1));
    novel
}

#[test]
fn imported_record_is_fully_populated() {
    let body = serde_json::to_value(imported()).unwrap();

    assert_eq!(body["originalName"], json!("N/A"));
    assert_eq!(body["link"], json!("N/A"));
    assert_eq!(body["detail"]["description"], json!(""));
    assert_eq!(body["detail"]["status"], json!("Reading"));
    assert_eq!(body["opinion"]["favorite"], json!(false));
    assert_eq!(body["opinion"]["comments"], json!(""));
}

#[test]
fn resubmitting_imported_values_changes_nothing() {
    let novel = imported();
    let mut proposed = Map::new();
    for path in FieldPath::all() {
        proposed.insert(path.key(), novel.get(path).to_json());
    }

    let changes = compute_changes(&novel, &proposed).unwrap();
    assert!(!changes.has_changes());
    assert!(matches!(changes.require_changes(), Err(AppError::NoChanges)));
}

#[test]
fn patch_merges_back_to_the_proposed_values() {
    let original = imported();
    let proposed = edits(json!({
        "genre": "Xianxia",
        "novelDetails_status": "Completed",
        "novelDetails_mcName": "X",
        "novelOpinion_rating": 9,
        "novelOpinion_worthToContinue": true
    }));

    let changes = compute_changes(&original, &proposed).unwrap();
    assert_eq!(changes.len(), 5);

    let patch = build_patch(&original, &changes).unwrap();
    let detail = patch.detail.as_ref().unwrap();
    assert_eq!(detail.status, Some(NovelStatus::Completed));
    assert_eq!(detail.mc_name, "X");
    assert_eq!(detail.tags, "system, cultivation");
    assert_eq!(detail.total_chapters, Some(10));

    let mut merged = original.clone();
    patch.apply_to(&mut merged);
    for (key, value) in &proposed {
        let path = FieldPath::classify(key).unwrap();
        assert_eq!(&merged.get(path).to_json(), value);
    }
    assert_eq!(merged.name, original.name);
    assert_eq!(merged.link, original.link);
    assert_eq!(merged.opinion.chapters_read, original.opinion.chapters_read);
}
