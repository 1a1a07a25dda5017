//! Classified edit keys.
//!
//! Edits arrive flattened: `novelDetails_<field>`, `novelOpinion_<field>` or a
//! bare top-level key. [`FieldPath::classify`] is the only place those
//! prefixes are inspected; everything downstream matches on the enum.

use std::fmt;

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::NovelStatus;

/// Key prefix for fields of the detail sub-structure.
pub const DETAIL_PREFIX: &str = "novelDetails_";

/// Key prefix for fields of the opinion sub-structure.
pub const OPINION_PREFIX: &str = "novelOpinion_";

/// Generates a field enum with its native (camelCase) names.
macro_rules! field_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Field name as it appears inside its own sub-structure.
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|f| f.name() == name)
            }
        }
    };
}

field_enum! {
    /// Editable top-level fields.
    NovelField {
        Name => "name",
        OriginalName => "originalName",
        Genre => "genre",
        Link => "link",
    }
}

field_enum! {
    /// Editable fields of [`Detail`](crate::models::Detail).
    DetailField {
        Description => "description",
        McName => "mcName",
        Tags => "tags",
        SpecialCharacteristicOfMc => "specialCharacteristicOfMc",
        Status => "status",
        TotalChapters => "totalChapters",
        NovelCover => "novelCover",
    }
}

field_enum! {
    /// Editable fields of [`Opinion`](crate::models::Opinion).
    OpinionField {
        Rating => "rating",
        ChaptersRead => "chaptersRead",
        Favorite => "favorite",
        WorthToContinue => "worthToContinue",
        Comments => "comments",
    }
}

/// The value type a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Short string, defaults to `"N/A"` on import
    Text,
    /// Free text, defaults to `""` on import
    FreeText,
    /// Non-negative integer
    Count,
    /// Integer 0..=10
    Rating,
    Flag,
    Status,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Text | FieldKind::FreeText => "text",
            FieldKind::Count => "non-negative integer",
            FieldKind::Rating => "rating 0-10",
            FieldKind::Flag => "boolean",
            FieldKind::Status => "status",
        })
    }
}

/// Which sub-structure a flattened key belongs to, and which field in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    Novel(NovelField),
    Detail(DetailField),
    Opinion(OpinionField),
}

impl FieldPath {
    /// Classify a flattened edit key.
    pub fn classify(key: &str) -> Result<Self> {
        let path = if let Some(rest) = key.strip_prefix(DETAIL_PREFIX) {
            DetailField::from_name(rest).map(FieldPath::Detail)
        } else if let Some(rest) = key.strip_prefix(OPINION_PREFIX) {
            OpinionField::from_name(rest).map(FieldPath::Opinion)
        } else {
            NovelField::from_name(key).map(FieldPath::Novel)
        };
        path.ok_or_else(|| AppError::unresolvable(key))
    }

    /// Every editable field, top-level first.
    pub fn all() -> impl Iterator<Item = FieldPath> {
        NovelField::ALL
            .iter()
            .copied()
            .map(FieldPath::Novel)
            .chain(DetailField::ALL.iter().copied().map(FieldPath::Detail))
            .chain(OpinionField::ALL.iter().copied().map(FieldPath::Opinion))
    }

    /// Denamespaced field name.
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldPath::Novel(f) => f.name(),
            FieldPath::Detail(f) => f.name(),
            FieldPath::Opinion(f) => f.name(),
        }
    }

    /// Namespaced key; [`FieldPath::classify`] maps it back to `self`.
    pub fn key(&self) -> String {
        match self {
            FieldPath::Novel(f) => f.name().to_string(),
            FieldPath::Detail(f) => format!("{}{}", DETAIL_PREFIX, f.name()),
            FieldPath::Opinion(f) => format!("{}{}", OPINION_PREFIX, f.name()),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldPath::Novel(_) => FieldKind::Text,
            FieldPath::Detail(f) => match f {
                DetailField::Description => FieldKind::FreeText,
                DetailField::Status => FieldKind::Status,
                DetailField::TotalChapters => FieldKind::Count,
                _ => FieldKind::Text,
            },
            FieldPath::Opinion(f) => match f {
                OpinionField::Rating => FieldKind::Rating,
                OpinionField::ChaptersRead => FieldKind::Count,
                OpinionField::Favorite | OpinionField::WorthToContinue => FieldKind::Flag,
                OpinionField::Comments => FieldKind::FreeText,
            },
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A typed field value, read from or written to a [`Novel`](crate::models::Novel).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// `None` only where the field itself is optional (`totalChapters`)
    Count(Option<u32>),
    Rating(u8),
    Flag(bool),
    Status(Option<NovelStatus>),
}

impl FieldValue {
    /// JSON form as the store would see it; unset values are `null`.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Count(Some(n)) => Value::from(*n),
            FieldValue::Count(None) | FieldValue::Status(None) => Value::Null,
            FieldValue::Rating(r) => Value::from(*r),
            FieldValue::Flag(b) => Value::Bool(*b),
            FieldValue::Status(Some(s)) => Value::String(s.as_str().to_string()),
        }
    }
}
