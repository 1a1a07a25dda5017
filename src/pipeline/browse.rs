// src/pipeline/browse.rs

//! Read-side operations: listing, lookup, manual add.

use futures::{StreamExt, TryStreamExt, stream};

use crate::error::{AppError, Result};
use crate::models::{Novel, NovelId};
use crate::pipeline::filter::NovelFilter;
use crate::services::NovelStore;

/// List novels: server-side name/genre query, then local filtering.
pub async fn run_list(store: &dyn NovelStore, filter: &NovelFilter) -> Result<Vec<Novel>> {
    let (name, genre) = filter.query();
    let novels = store.list(name, genre).await?;
    let total = novels.len();

    let kept = filter.apply(novels);
    log::debug!("Filter kept {} of {} novels", kept.len(), total);
    Ok(kept)
}

/// Fetch several novels with bounded concurrency, in request order.
pub async fn fetch_many(
    store: &dyn NovelStore,
    ids: &[NovelId],
    concurrency: usize,
) -> Result<Vec<Novel>> {
    stream::iter(ids)
        .map(|id| store.get(id))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

/// Create one novel after validating it.
pub async fn run_add(store: &dyn NovelStore, novel: &Novel) -> Result<Novel> {
    novel.validate()?;

    let response = store.create(novel).await?;
    if !response.success {
        let message = if response.message.is_empty() {
            "store rejected the novel".to_string()
        } else {
            response.message
        };
        return Err(AppError::validation(message));
    }

    log::info!("Created '{}': {}", novel.name, response.message);
    Ok(response.novel.unwrap_or_else(|| novel.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NovelStatus;
    use crate::pipeline::testing::MemoryStore;

    fn store() -> MemoryStore {
        let mut alpha = Novel::new("Alpha");
        alpha.genre = "Fantasy".into();
        alpha.opinion.favorite = true;

        let mut beta = Novel::new("Beta");
        beta.genre = "Fantasy".into();
        beta.detail.status = Some(NovelStatus::Dropped);

        let mut gamma = Novel::new("Gamma");
        gamma.genre = "Mystery".into();

        MemoryStore::with(vec![alpha, beta, gamma])
    }

    #[tokio::test]
    async fn test_list_combines_server_and_local_filters() {
        let store = store();
        let filter = NovelFilter {
            genre: Some("fantasy".into()),
            favorites_only: true,
            ..NovelFilter::default()
        };

        let found = run_list(&store, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Alpha");
    }

    #[tokio::test]
    async fn test_fetch_many_keeps_order() {
        let store = store();
        let ids = [NovelId::Number(3), NovelId::Number(1)];

        let novels = fetch_many(&store, &ids, 2).await.unwrap();
        let names: Vec<_> = novels.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Alpha"]);
    }

    #[tokio::test]
    async fn test_fetch_many_fails_on_missing_id() {
        let store = store();
        let ids = [NovelId::Number(1), NovelId::Number(42)];
        assert!(fetch_many(&store, &ids, 4).await.is_err());
    }

    #[tokio::test]
    async fn test_add_assigns_id() {
        let store = store();
        let created = run_add(&store, &Novel::new("Delta")).await.unwrap();
        assert_eq!(created.id, Some(NovelId::Number(4)));
        assert_eq!(store.snapshot().len(), 4);
    }

    #[tokio::test]
    async fn test_add_rejects_nameless_novel() {
        let store = store();
        let err = run_add(&store, &Novel::new("")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.snapshot().len(), 3);
    }
}
