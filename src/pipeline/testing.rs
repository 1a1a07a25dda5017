//! In-memory store for pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Novel, NovelId};
use crate::pipeline::reconcile::NovelPatch;
use crate::services::{BulkResponse, CreateResponse, NovelStore};

#[derive(Default)]
pub struct MemoryStore {
    novels: Mutex<Vec<Novel>>,
    patches: Mutex<Vec<(NovelId, NovelPatch)>>,
}

impl MemoryStore {
    pub fn with(novels: Vec<Novel>) -> Self {
        let store = Self::default();
        for novel in novels {
            store.insert(novel);
        }
        store
    }

    fn insert(&self, mut novel: Novel) -> Novel {
        let mut novels = self.novels.lock().unwrap();
        if novel.id.is_none() {
            novel.id = Some(NovelId::Number(novels.len() as i64 + 1));
        }
        novels.push(novel.clone());
        novel
    }

    pub fn snapshot(&self) -> Vec<Novel> {
        self.novels.lock().unwrap().clone()
    }

    pub fn patches(&self) -> Vec<(NovelId, NovelPatch)> {
        self.patches.lock().unwrap().clone()
    }
}

fn not_found(id: &NovelId) -> AppError {
    AppError::api(404, format!("Novel {} not found", id))
}

#[async_trait]
impl NovelStore for MemoryStore {
    async fn list(&self, name: Option<&str>, genre: Option<&str>) -> Result<Vec<Novel>> {
        let lower = |s: &str| s.to_lowercase();
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|n| name.is_none_or(|q| lower(&n.name).contains(&lower(q))))
            .filter(|n| genre.is_none_or(|q| lower(&n.genre).contains(&lower(q))))
            .collect())
    }

    async fn get(&self, id: &NovelId) -> Result<Novel> {
        self.snapshot()
            .into_iter()
            .find(|n| n.id.as_ref() == Some(id))
            .ok_or_else(|| not_found(id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Novel>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|n| n.name == name)
            .collect())
    }

    async fn create(&self, novel: &Novel) -> Result<CreateResponse> {
        let created = self.insert(novel.clone());
        Ok(CreateResponse {
            success: true,
            message: "Novel added".to_string(),
            novel: Some(created),
        })
    }

    async fn create_bulk(&self, novels: &[Novel]) -> Result<BulkResponse> {
        for novel in novels {
            self.insert(novel.clone());
        }
        Ok(BulkResponse {
            inserted_count: novels.len(),
            message: format!("{} novels inserted", novels.len()),
        })
    }

    async fn update(&self, id: &NovelId, patch: &NovelPatch) -> Result<Novel> {
        let mut novels = self.novels.lock().unwrap();
        let novel = novels
            .iter_mut()
            .find(|n| n.id.as_ref() == Some(id))
            .ok_or_else(|| not_found(id))?;
        patch.apply_to(novel);
        self.patches.lock().unwrap().push((id.clone(), patch.clone()));
        Ok(novel.clone())
    }
}
