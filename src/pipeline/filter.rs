//! Search and filter over fetched novels.

use crate::models::{Novel, NovelStatus};

/// Criteria for narrowing a novel listing.
///
/// `name` and `genre` are also sent to the store; the rest only apply locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NovelFilter {
    /// Case-insensitive substring of the name or original name
    pub name: Option<String>,
    /// Case-insensitive substring of the genre
    pub genre: Option<String>,
    pub status: Option<NovelStatus>,
    pub favorites_only: bool,
    pub min_rating: Option<u8>,
}

impl NovelFilter {
    /// Name and genre as query parameters for `GET /novels/all`.
    pub fn query(&self) -> (Option<&str>, Option<&str>) {
        (non_blank(&self.name), non_blank(&self.genre))
    }

    pub fn matches(&self, novel: &Novel) -> bool {
        if let Some(name) = non_blank(&self.name) {
            if !contains_ignore_case(&novel.name, name)
                && !contains_ignore_case(&novel.original_name, name)
            {
                return false;
            }
        }
        if let Some(genre) = non_blank(&self.genre) {
            if !contains_ignore_case(&novel.genre, genre) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if novel.detail.status != Some(status) {
                return false;
            }
        }
        if self.favorites_only && !novel.opinion.favorite {
            return false;
        }
        if let Some(min) = self.min_rating {
            if novel.opinion.rating < min {
                return false;
            }
        }
        true
    }

    /// Keep only matching novels, preserving order.
    pub fn apply(&self, novels: Vec<Novel>) -> Vec<Novel> {
        novels.into_iter().filter(|n| self.matches(n)).collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn novel(name: &str, genre: &str, status: Option<NovelStatus>, rating: u8, fav: bool) -> Novel {
        let mut n = Novel::new(name);
        n.genre = genre.into();
        n.detail.status = status;
        n.opinion.rating = rating;
        n.opinion.favorite = fav;
        n
    }

    fn shelf() -> Vec<Novel> {
        vec![
            novel("Reverend Insanity", "Xianxia", Some(NovelStatus::Dropped), 9, true),
            novel("Lord of the Mysteries", "Mystery", Some(NovelStatus::Completed), 10, true),
            novel("Shadow Slave", "Fantasy", Some(NovelStatus::Reading), 8, false),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        assert_eq!(NovelFilter::default().apply(shelf()).len(), 3);
        assert_eq!(NovelFilter::default().query(), (None, None));
    }

    #[test]
    fn test_name_is_case_insensitive_substring() {
        let filter = NovelFilter {
            name: Some("mYsTeR".into()),
            ..NovelFilter::default()
        };
        let found = filter.apply(shelf());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Lord of the Mysteries");
    }

    #[test]
    fn test_name_matches_original_name() {
        let mut n = Novel::new("Lord of the Mysteries");
        n.original_name = "诡秘之主".into();
        let filter = NovelFilter {
            name: Some("诡秘".into()),
            ..NovelFilter::default()
        };
        assert!(filter.matches(&n));
    }

    #[test]
    fn test_local_criteria_combine() {
        let filter = NovelFilter {
            favorites_only: true,
            min_rating: Some(10),
            ..NovelFilter::default()
        };
        let found = filter.apply(shelf());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].genre, "Mystery");

        let filter = NovelFilter {
            status: Some(NovelStatus::Reading),
            ..NovelFilter::default()
        };
        assert_eq!(filter.apply(shelf())[0].name, "Shadow Slave");
    }

    #[test]
    fn test_blank_query_values_are_dropped() {
        let filter = NovelFilter {
            name: Some("  ".into()),
            genre: Some("Fantasy".into()),
            ..NovelFilter::default()
        };
        assert_eq!(filter.query(), (None, Some("Fantasy")));
    }
}
