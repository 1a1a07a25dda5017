//! Novel record and the sub-structures it owns.
//!
//! JSON shapes follow the Novel Store API: camelCase keys, the detail and
//! opinion objects nested under `detail` / `opinion`.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::field::{DetailField, FieldPath, FieldValue, NovelField, OpinionField};
use crate::pipeline::coerce::loose_count;

/// Highest rating a novel can be given.
pub const MAX_RATING: u8 = 10;

/// Store-assigned identifier. The store may hand out numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NovelId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NovelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NovelId::Number(n) => write!(f, "{}", n),
            NovelId::Text(s) => f.write_str(s),
        }
    }
}

/// Numeric only when the text is the canonical form of the number, so the
/// id renders back exactly as given (`"007"` stays `"007"`).
impl From<&str> for NovelId {
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => NovelId::Number(n),
            _ => NovelId::Text(s.to_string()),
        }
    }
}

impl From<i64> for NovelId {
    fn from(n: i64) -> Self {
        NovelId::Number(n)
    }
}

/// Reading status of a novel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NovelStatus {
    Reading,
    Completed,
    Dropped,
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Plan to Read")]
    PlanToRead,
}

impl NovelStatus {
    pub const ALL: [NovelStatus; 5] = [
        NovelStatus::Reading,
        NovelStatus::Completed,
        NovelStatus::Dropped,
        NovelStatus::OnHold,
        NovelStatus::PlanToRead,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NovelStatus::Reading => "Reading",
            NovelStatus::Completed => "Completed",
            NovelStatus::Dropped => "Dropped",
            NovelStatus::OnHold => "On Hold",
            NovelStatus::PlanToRead => "Plan to Read",
        }
    }

    /// Parse a status label, ignoring case, spaces, dashes and underscores.
    ///
    /// `"on-hold"`, `"ONHOLD"` and `"On Hold"` all resolve to [`NovelStatus::OnHold`].
    pub fn from_label(label: &str) -> Option<Self> {
        let squashed: String = label
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match squashed.as_str() {
            "reading" => Some(NovelStatus::Reading),
            "completed" => Some(NovelStatus::Completed),
            "dropped" => Some(NovelStatus::Dropped),
            "onhold" => Some(NovelStatus::OnHold),
            "plantoread" => Some(NovelStatus::PlanToRead),
            _ => None,
        }
    }
}

impl fmt::Display for NovelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive sub-structure of a novel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    #[serde(default, deserialize_with = "nullable")]
    pub mc_name: String,

    /// Comma-separated, kept as the store represents it
    #[serde(default, deserialize_with = "nullable")]
    pub tags: String,

    #[serde(default, deserialize_with = "nullable")]
    pub special_characteristic_of_mc: String,

    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<NovelStatus>,

    #[serde(default, deserialize_with = "lenient_total")]
    pub total_chapters: Option<u32>,

    #[serde(default, deserialize_with = "nullable")]
    pub novel_cover: String,

    /// Assigned by the store on every write
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub last_updated_on: Option<DateTime<Utc>>,
}

impl Detail {
    /// Tags split on commas, trimmed, blanks dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// The reader's own tracking data for a novel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opinion {
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: u8,

    #[serde(default, deserialize_with = "lenient_count")]
    pub chapters_read: u32,

    #[serde(default, deserialize_with = "nullable")]
    pub favorite: bool,

    #[serde(default, deserialize_with = "nullable")]
    pub worth_to_continue: bool,

    #[serde(default, deserialize_with = "nullable")]
    pub comments: String,
}

/// A tracked novel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Novel {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<NovelId>,

    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    #[serde(default, deserialize_with = "nullable")]
    pub original_name: String,

    #[serde(default, deserialize_with = "nullable")]
    pub genre: String,

    #[serde(default, deserialize_with = "nullable")]
    pub link: String,

    #[serde(default, alias = "novelDetails", deserialize_with = "nullable")]
    pub detail: Detail,

    #[serde(default, alias = "novelOpinion", deserialize_with = "nullable")]
    pub opinion: Opinion,
}

impl Novel {
    /// Create a novel with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Short human-readable label: `name (#id)`.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("{} (#{})", self.name, id),
            None => self.name.clone(),
        }
    }

    /// Check the record before it is sent to the store.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name is required"));
        }
        if self.opinion.rating > MAX_RATING {
            return Err(AppError::validation(format!(
                "rating {} is above {}",
                self.opinion.rating, MAX_RATING
            )));
        }
        Ok(())
    }

    /// Read one field through its classified path.
    pub fn get(&self, path: FieldPath) -> FieldValue {
        match path {
            FieldPath::Novel(field) => FieldValue::Text(
                match field {
                    NovelField::Name => &self.name,
                    NovelField::OriginalName => &self.original_name,
                    NovelField::Genre => &self.genre,
                    NovelField::Link => &self.link,
                }
                .clone(),
            ),
            FieldPath::Detail(field) => {
                let d = &self.detail;
                match field {
                    DetailField::Description => FieldValue::Text(d.description.clone()),
                    DetailField::McName => FieldValue::Text(d.mc_name.clone()),
                    DetailField::Tags => FieldValue::Text(d.tags.clone()),
                    DetailField::SpecialCharacteristicOfMc => {
                        FieldValue::Text(d.special_characteristic_of_mc.clone())
                    }
                    DetailField::Status => FieldValue::Status(d.status),
                    DetailField::TotalChapters => FieldValue::Count(d.total_chapters),
                    DetailField::NovelCover => FieldValue::Text(d.novel_cover.clone()),
                }
            }
            FieldPath::Opinion(field) => {
                let o = &self.opinion;
                match field {
                    OpinionField::Rating => FieldValue::Rating(o.rating),
                    OpinionField::ChaptersRead => FieldValue::Count(Some(o.chapters_read)),
                    OpinionField::Favorite => FieldValue::Flag(o.favorite),
                    OpinionField::WorthToContinue => FieldValue::Flag(o.worth_to_continue),
                    OpinionField::Comments => FieldValue::Text(o.comments.clone()),
                }
            }
        }
    }

    /// Write one field through its classified path.
    ///
    /// Fails if the value's kind does not match the field.
    pub fn set(&mut self, path: FieldPath, value: FieldValue) -> Result<()> {
        let mismatch = |value: &FieldValue| {
            AppError::field_value(path.key(), format!("expected {}, got {:?}", path.kind(), value))
        };

        match (path, value) {
            (FieldPath::Novel(field), FieldValue::Text(text)) => {
                let slot = match field {
                    NovelField::Name => &mut self.name,
                    NovelField::OriginalName => &mut self.original_name,
                    NovelField::Genre => &mut self.genre,
                    NovelField::Link => &mut self.link,
                };
                *slot = text;
            }
            (FieldPath::Detail(DetailField::Status), FieldValue::Status(status)) => {
                self.detail.status = status;
            }
            (FieldPath::Detail(DetailField::TotalChapters), FieldValue::Count(count)) => {
                self.detail.total_chapters = count;
            }
            (FieldPath::Detail(field), FieldValue::Text(text)) => {
                let d = &mut self.detail;
                let slot = match field {
                    DetailField::Description => &mut d.description,
                    DetailField::McName => &mut d.mc_name,
                    DetailField::Tags => &mut d.tags,
                    DetailField::SpecialCharacteristicOfMc => &mut d.special_characteristic_of_mc,
                    DetailField::NovelCover => &mut d.novel_cover,
                    DetailField::Status | DetailField::TotalChapters => {
                        return Err(mismatch(&FieldValue::Text(text)));
                    }
                };
                *slot = text;
            }
            (FieldPath::Opinion(OpinionField::Rating), FieldValue::Rating(rating)) => {
                self.opinion.rating = rating.min(MAX_RATING);
            }
            (FieldPath::Opinion(OpinionField::ChaptersRead), FieldValue::Count(count)) => {
                self.opinion.chapters_read = count.unwrap_or(0);
            }
            (FieldPath::Opinion(OpinionField::Favorite), FieldValue::Flag(flag)) => {
                self.opinion.favorite = flag;
            }
            (FieldPath::Opinion(OpinionField::WorthToContinue), FieldValue::Flag(flag)) => {
                self.opinion.worth_to_continue = flag;
            }
            (FieldPath::Opinion(OpinionField::Comments), FieldValue::Text(text)) => {
                self.opinion.comments = text;
            }
            (_, other) => return Err(mismatch(&other)),
        }
        Ok(())
    }
}

/// Treat an explicit `null` the same as a missing key.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numbers or numeric strings; anything else reads as unset.
fn lenient_total<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_count(&Value::deserialize(deserializer)?))
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_total(deserializer)?.unwrap_or_default())
}

/// Saturates at `u8::MAX` rather than clamping to the rating scale, so
/// [`Novel::validate`] still sees an out-of-range rating.
fn lenient_rating<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let n = lenient_count(deserializer)?;
    Ok(u8::try_from(n).unwrap_or(u8::MAX))
}

/// Unknown or blank status labels read as unset.
fn lenient_status<'de, D>(deserializer: D) -> std::result::Result<Option<NovelStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(NovelStatus::from_label))
}

/// Accept RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc()))
}
