//! Unit tests for Catalog crate
//!
//! The store is an in-memory double with failure injection and a gate that
//! can hold reloads open.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use kernel::error::repo::{RepoError, RepoResult};
use tokio::sync::RwLock;

use crate::domain::entities::Item;
use crate::domain::repository::ItemRepository;
use crate::domain::value_objects::ItemName;

#[derive(Default)]
pub(crate) struct InMemoryItemRepository {
    rows: Mutex<Vec<Item>>,
    last_id: AtomicI64,
    select_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    /// Holding the write side blocks `select_all`
    read_gate: RwLock<()>,
}

impl InMemoryItemRepository {
    pub(crate) fn seeded(names: &[&str]) -> Self {
        let repo = Self::default();
        {
            let mut rows = repo.rows.lock().unwrap();
            for name in names {
                let id = repo.last_id.fetch_add(1, Ordering::SeqCst) + 1;
                rows.push(Item {
                    id,
                    name: name.to_string(),
                });
            }
        }
        repo
    }

    pub(crate) fn select_calls(&self) -> usize {
        self.select_calls.load(Ordering::SeqCst)
    }

    fn unavailable() -> RepoError {
        RepoError::Backend(sqlx::Error::PoolTimedOut)
    }
}

impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, name: &ItemName) -> RepoResult<i64> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().unwrap().push(Item {
            id,
            name: name.as_str().to_string(),
        });
        Ok(id)
    }

    async fn select_all(&self) -> RepoResult<Vec<Item>> {
        let _gate = self.read_gate.read().await;
        self.select_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(|item| item.id);
        Ok(rows)
    }

    async fn update(&self, id: i64, name: &ItemName) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(RepoError::NotFound)?;
        row.name = name.as_str().to_string();
        Ok(())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|item| item.id != id);
        RepoError::expect_rows((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod cache_tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::application::{CacheState, CatalogConfig, ItemCache};
    use crate::error::CatalogError;

    type Cache = ItemCache<InMemoryItemRepository>;

    fn cache_with(
        repo: InMemoryItemRepository,
        config: CatalogConfig,
    ) -> (Arc<InMemoryItemRepository>, Cache) {
        let repo = Arc::new(repo);
        let cache = ItemCache::new(repo.clone(), &config);
        (repo, cache)
    }

    fn inline_cache(repo: InMemoryItemRepository) -> (Arc<InMemoryItemRepository>, Cache) {
        cache_with(repo, CatalogConfig::inline())
    }

    fn detached_cache(repo: InMemoryItemRepository) -> (Arc<InMemoryItemRepository>, Cache) {
        cache_with(repo, CatalogConfig::default())
    }

    async fn eventually_contains(cache: &Cache, name: &str) -> bool {
        for _ in 0..100 {
            if cache.list().await.unwrap().iter().any(|item| item.name == name) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_first_list_loads_snapshot() {
        let (repo, cache) = inline_cache(InMemoryItemRepository::seeded(&["Hats", "Socks"]));
        assert_eq!(cache.state(), CacheState::Uninitialized);

        let items = cache.list().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Hats");
        assert_eq!(cache.state(), CacheState::Populated);

        // Served from the snapshot afterwards
        cache.list().await.unwrap();
        assert_eq!(repo.select_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let (_, cache) = inline_cache(InMemoryItemRepository::default());
        assert!(cache.list().await.unwrap().is_empty());
        assert_eq!(cache.state(), CacheState::Populated);
    }

    #[tokio::test]
    async fn test_initial_load_failure_propagates() {
        let (repo, cache) = inline_cache(InMemoryItemRepository::seeded(&["Hats"]));
        repo.fail_reads.store(true, Ordering::SeqCst);

        let err = cache.list().await.unwrap_err();
        assert!(matches!(err, CatalogError::Repo(RepoError::Backend(_))));
        assert_eq!(cache.state(), CacheState::Uninitialized);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_lists_share_one_scan() {
        let (repo, cache) = inline_cache(InMemoryItemRepository::seeded(&["Hats", "Socks"]));

        let gate = repo.read_gate.write().await;
        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move { cache.list().await }));
        }

        // First load is in flight; there is no snapshot to call "reloading"
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.state(), CacheState::Uninitialized);

        drop(gate);
        for handle in handles {
            let items = handle.await.unwrap().unwrap();
            assert_eq!(items.len(), 2);
        }

        assert_eq!(repo.select_calls(), 1);
        assert_eq!(cache.state(), CacheState::Populated);
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let (_, cache) = inline_cache(InMemoryItemRepository::default());

        let item = cache.add("Shoes").await.unwrap();
        assert_eq!(item.name, "Shoes");

        let items = cache.list().await.unwrap();
        assert_eq!(items, vec![item]);
    }

    #[tokio::test]
    async fn test_add_detached_is_eventually_visible() {
        let (_, cache) = detached_cache(InMemoryItemRepository::seeded(&["Hats"]));
        cache.list().await.unwrap();

        cache.add("Shoes").await.unwrap();
        assert!(eventually_contains(&cache, "Shoes").await);
    }

    #[tokio::test]
    async fn test_add_trims_and_validates() {
        let (repo, cache) = inline_cache(InMemoryItemRepository::default());

        let item = cache.add("  Boots  ").await.unwrap();
        assert_eq!(item.name, "Boots");

        for short in ["", "   ", "abc"] {
            let err = cache.add(short).await.unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        }
        assert_eq!(repo.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_schedules_no_reload() {
        let (repo, cache) = inline_cache(InMemoryItemRepository::default());
        cache.list().await.unwrap();
        repo.fail_writes.store(true, Ordering::SeqCst);

        assert!(cache.add("Shoes").await.is_err());
        assert!(cache.remove(1).await.is_err());
        assert_eq!(repo.select_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (_, cache) = inline_cache(InMemoryItemRepository::seeded(&["Hats", "Socks"]));

        let item = cache.get_by_id(2).await.unwrap();
        assert_eq!(item.name, "Socks");

        let err = cache.get_by_id(999).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(999)));
    }

    #[tokio::test]
    async fn test_remove() {
        let (_, cache) = inline_cache(InMemoryItemRepository::seeded(&["Hats", "Socks"]));

        cache.remove(1).await.unwrap();
        let items = cache.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Socks");
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let (repo, cache) = inline_cache(InMemoryItemRepository::default());

        let err = cache.remove(999).await.unwrap_err();
        assert!(matches!(err, CatalogError::Repo(RepoError::NotFound)));
        assert_eq!(repo.select_calls(), 0);
    }

    #[tokio::test]
    async fn test_update() {
        let (_, cache) = inline_cache(InMemoryItemRepository::seeded(&["Hats"]));
        cache.list().await.unwrap();

        let renamed = Item {
            id: 1,
            name: "Caps and Hats".to_string(),
        };
        cache.update(&renamed).await.unwrap();
        assert_eq!(cache.get_by_id(1).await.unwrap(), renamed);

        let missing = Item {
            id: 42,
            name: "Ghost".to_string(),
        };
        let err = cache.update(&missing).await.unwrap_err();
        assert!(matches!(err, CatalogError::Repo(RepoError::NotFound)));

        let short = Item {
            id: 1,
            name: "ab".to_string(),
        };
        assert!(matches!(
            cache.update(&short).await,
            Err(CatalogError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let (repo, cache) = inline_cache(InMemoryItemRepository::seeded(&["Hats"]));
        let before = cache.list().await.unwrap();

        repo.fail_reads.store(true, Ordering::SeqCst);
        // The write itself is accepted; only the follow-up reload fails
        cache.add("Shoes").await.unwrap();

        assert_eq!(cache.list().await.unwrap(), before);
        assert!(cache.reload_all().await.is_err());
        assert_eq!(cache.state(), CacheState::Populated);

        repo.fail_reads.store(false, Ordering::SeqCst);
        cache.reload_all().await.unwrap();
        assert_eq!(cache.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_readers_not_blocked_by_reload() {
        let (repo, cache) = inline_cache(InMemoryItemRepository::seeded(&["Hats"]));
        let before = cache.list().await.unwrap();

        let gate = repo.read_gate.write().await;
        let reload = tokio::spawn({
            let cache = cache.clone();
            async move { cache.reload_all().await }
        });

        while cache.state() != CacheState::Reloading {
            tokio::task::yield_now().await;
        }

        // Snapshot still served while the rebuild is held open
        assert_eq!(cache.list().await.unwrap(), before);

        drop(gate);
        reload.await.unwrap().unwrap();
        assert_eq!(cache.state(), CacheState::Populated);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_all_land() {
        let (_, cache) = detached_cache(InMemoryItemRepository::default());

        let mut handles = Vec::new();
        for n in 0..20 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.add(&format!("Item {n:02}")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Whatever detached reloads did, a final reload sees every write
        cache.reload_all().await.unwrap();
        let items = cache.list().await.unwrap();
        assert_eq!(items.len(), 20);

        let mut ids: Vec<i64> = items.iter().map(|item| item.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_see_whole_snapshots() {
        let (_, cache) = detached_cache(InMemoryItemRepository::default());
        cache.list().await.unwrap();

        let writer = tokio::spawn({
            let cache = cache.clone();
            async move {
                for n in 0..20 {
                    cache.add(&format!("Item {n:02}")).await.unwrap();
                }
            }
        });

        while !writer.is_finished() {
            let items = cache.list().await.unwrap();
            // Every snapshot is a prefix of the insert order
            for (index, item) in items.iter().enumerate() {
                assert_eq!(item.id, index as i64 + 1);
            }
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();

        assert!(eventually_contains(&cache, "Item 19").await);
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;
    use kernel::error::app_error::AppError;
    use kernel::error::repo::RepoError;

    use crate::error::CatalogError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CatalogError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(CatalogError::NotFound(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            CatalogError::Repo(RepoError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CatalogError::Repo(RepoError::Backend(sqlx::Error::PoolTimedOut)).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let app: AppError = CatalogError::Internal("secret detail".into()).into();
        assert!(!app.message().contains("secret detail"));
    }
}

#[cfg(test)]
mod router_tests {
    use super::*;
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::application::{CatalogConfig, ItemCache};
    use crate::presentation::CatalogAppState;
    use crate::presentation::dto::ItemResponse;
    use crate::presentation::router::catalog_router_generic;

    fn app(repo: InMemoryItemRepository) -> Router {
        let cache = ItemCache::new(Arc::new(repo), &CatalogConfig::inline());
        catalog_router_generic(CatalogAppState { cache })
    }

    fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let app = app(InMemoryItemRepository::default());

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/catalog/products",
                Some(serde_json::json!({ "name": "Shoes" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: ItemResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(created.name, "Shoes");

        let response = app
            .oneshot(request("GET", "/catalog/products", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let items: Vec<ItemResponse> = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(items, vec![created]);
    }

    #[tokio::test]
    async fn test_short_name_is_bad_request() {
        let response = app(InMemoryItemRepository::default())
            .oneshot(request(
                "POST",
                "/catalog/products",
                Some(serde_json::json!({ "name": " ab " })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_integer_id_is_bad_request() {
        let app = app(InMemoryItemRepository::seeded(&["Hats"]));
        for method in ["GET", "DELETE"] {
            let response = app
                .clone()
                .oneshot(request(method, "/catalog/products/abc", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method}");
        }
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let app = app(InMemoryItemRepository::seeded(&["Hats"]));

        let get = app
            .clone()
            .oneshot(request("GET", "/catalog/products/999", None))
            .await
            .unwrap();
        assert_eq!(get.status(), StatusCode::NOT_FOUND);

        let delete = app
            .clone()
            .oneshot(request("DELETE", "/catalog/products/999", None))
            .await
            .unwrap();
        assert_eq!(delete.status(), StatusCode::NOT_FOUND);

        let put = app
            .oneshot(request(
                "PUT",
                "/catalog/products/999",
                Some(serde_json::json!({ "name": "Ghost" })),
            ))
            .await
            .unwrap();
        assert_eq!(put.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_update_delete() {
        let app = app(InMemoryItemRepository::seeded(&["Hats"]));

        let response = app
            .clone()
            .oneshot(request("GET", "/catalog/products/1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                "/catalog/products/1",
                Some(serde_json::json!({ "name": "Wool Hats" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: ItemResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(
            updated,
            ItemResponse {
                id: 1,
                name: "Wool Hats".to_string()
            }
        );

        let response = app
            .clone()
            .oneshot(request("DELETE", "/catalog/products/1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(request("GET", "/catalog/products/1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_writes_with_session_identity() {
        use auth::{AuthenticatedUser, Claims, UserRole};
        use axum::Extension;

        use crate::presentation::handlers::actor_name;

        let user = AuthenticatedUser(Claims {
            sub: "alice".to_string(),
            role: UserRole::User,
            authorized: true,
            exp: i64::MAX,
        });
        assert_eq!(actor_name(&Some(Extension(user.clone()))), "alice");
        assert_eq!(actor_name(&None), "anonymous");

        let app = app(InMemoryItemRepository::default()).layer(Extension(user));

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/catalog/products",
                Some(serde_json::json!({ "name": "Shoes" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                "/catalog/products/1",
                Some(serde_json::json!({ "name": "Boots" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("DELETE", "/catalog/products/1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
