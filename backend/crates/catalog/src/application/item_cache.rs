//! Item Cache
//!
//! In-memory mirror of the item table.
//!
//! Two locks are involved and they never nest:
//! - the write lock serialises store writes
//! - the reload lock serialises snapshot rebuilds
//!
//! Readers take neither. They load the current snapshot `Arc`, which a
//! reload replaces in a single store once the new list is fully built.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwapOption;
use tokio::sync::Mutex;

use crate::application::config::{CatalogConfig, ReloadPolicy};
use crate::domain::entities::Item;
use crate::domain::repository::ItemRepository;
use crate::domain::value_objects::ItemName;
use crate::error::{CatalogError, CatalogResult};

/// Observable lifecycle of the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No snapshot has been loaded yet
    Uninitialized,
    Populated,
    /// A rebuild is running; readers still see the previous snapshot
    Reloading,
}

struct Inner<R> {
    repo: Arc<R>,
    snapshot: ArcSwapOption<Vec<Item>>,
    write_lock: Mutex<()>,
    reload_lock: Mutex<()>,
    reloading: AtomicBool,
    policy: ReloadPolicy,
}

/// Cheap to clone; clones share the snapshot and both locks.
pub struct ItemCache<R>
where
    R: ItemRepository + Send + Sync + 'static,
{
    inner: Arc<Inner<R>>,
}

impl<R> Clone for ItemCache<R>
where
    R: ItemRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R> ItemCache<R>
where
    R: ItemRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: &CatalogConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                repo,
                snapshot: ArcSwapOption::empty(),
                write_lock: Mutex::new(()),
                reload_lock: Mutex::new(()),
                reloading: AtomicBool::new(false),
                policy: config.reload_policy,
            }),
        }
    }

    pub fn state(&self) -> CacheState {
        if self.inner.snapshot.load().is_none() {
            CacheState::Uninitialized
        } else if self.inner.reloading.load(Ordering::Acquire) {
            CacheState::Reloading
        } else {
            CacheState::Populated
        }
    }

    /// Copy of the current snapshot.
    ///
    /// The first call loads synchronously; only that load can fail.
    /// Concurrent first calls share a single scan.
    pub async fn list(&self) -> CatalogResult<Vec<Item>> {
        if let Some(items) = self.inner.snapshot.load_full() {
            return Ok(items.as_ref().clone());
        }

        self.load_initial().await?;

        Ok(self
            .inner
            .snapshot
            .load_full()
            .map(|items| items.as_ref().clone())
            .unwrap_or_default())
    }

    /// Look up one item in the snapshot
    pub async fn get_by_id(&self, id: i64) -> CatalogResult<Item> {
        self.list()
            .await?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(CatalogError::NotFound(id))
    }

    /// Insert a new item and schedule a reload.
    ///
    /// Returns the stored item; it shows up in `list()` once the reload lands.
    pub async fn add(&self, name: &str) -> CatalogResult<Item> {
        let name = ItemName::new(name)?;

        let id = {
            let _guard = self.inner.write_lock.lock().await;
            self.inner.repo.insert(&name).await?
        };

        tracing::info!(item_id = id, name = %name, "Item added");
        self.schedule_reload().await;

        Ok(Item {
            id,
            name: name.into_inner(),
        })
    }

    /// Rename an existing item and schedule a reload
    pub async fn update(&self, item: &Item) -> CatalogResult<Item> {
        let name = ItemName::new(&item.name)?;

        {
            let _guard = self.inner.write_lock.lock().await;
            self.inner.repo.update(item.id, &name).await?;
        }

        tracing::info!(item_id = item.id, name = %name, "Item updated");
        self.schedule_reload().await;

        Ok(Item {
            id: item.id,
            name: name.into_inner(),
        })
    }

    /// Delete by id and schedule a reload.
    ///
    /// An id that matched no row is `Repo(NotFound)` and schedules nothing.
    pub async fn remove(&self, id: i64) -> CatalogResult<()> {
        {
            let _guard = self.inner.write_lock.lock().await;
            self.inner.repo.delete(id).await?;
        }

        tracing::info!(item_id = id, "Item removed");
        self.schedule_reload().await;

        Ok(())
    }

    /// Rebuild the snapshot from the store.
    ///
    /// On failure the previous snapshot stays published.
    pub async fn reload_all(&self) -> CatalogResult<()> {
        let _guard = self.inner.reload_lock.lock().await;
        self.rebuild().await
    }

    async fn load_initial(&self) -> CatalogResult<()> {
        let _guard = self.inner.reload_lock.lock().await;

        // Another caller may have loaded while we waited
        if self.inner.snapshot.load().is_some() {
            return Ok(());
        }

        self.rebuild().await
    }

    /// Caller holds the reload lock
    async fn rebuild(&self) -> CatalogResult<()> {
        self.inner.reloading.store(true, Ordering::Release);
        let result = self.inner.repo.select_all().await;
        self.inner.reloading.store(false, Ordering::Release);

        let items = result?;
        let count = items.len();
        self.inner.snapshot.store(Some(Arc::new(items)));

        tracing::debug!(count, "Item snapshot reloaded");
        Ok(())
    }

    async fn schedule_reload(&self) {
        match self.inner.policy {
            ReloadPolicy::Detached => {
                let cache = self.clone();
                tokio::spawn(async move {
                    if let Err(e) = cache.reload_all().await {
                        tracing::error!(error = %e, "Background item reload failed");
                    }
                });
            }
            ReloadPolicy::Inline => {
                if let Err(e) = self.reload_all().await {
                    tracing::error!(error = %e, "Item reload failed");
                }
            }
        }
    }
}
