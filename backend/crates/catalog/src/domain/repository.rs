//! Repository Traits
//!
//! Interface for item persistence. Implementation is in infrastructure layer.

use kernel::error::repo::RepoResult;

use crate::domain::entities::Item;
use crate::domain::value_objects::ItemName;

/// Item repository trait
#[trait_variant::make(ItemRepository: Send)]
pub trait LocalItemRepository {
    /// Insert an item and return the assigned id
    async fn insert(&self, name: &ItemName) -> RepoResult<i64>;

    /// Every item, in id order
    async fn select_all(&self) -> RepoResult<Vec<Item>>;

    /// Rename by id. `RepoError::NotFound` when no row matched.
    async fn update(&self, id: i64, name: &ItemName) -> RepoResult<()>;

    /// Delete by id. `RepoError::NotFound` when no row matched.
    async fn delete(&self, id: i64) -> RepoResult<()>;
}
