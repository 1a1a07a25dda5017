//! Service layer for the Novel Store API.

mod store;

pub use store::{BulkResponse, CreateResponse, HttpNovelStore, NovelStore};
