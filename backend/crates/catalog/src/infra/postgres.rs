//! PostgreSQL Repository Implementations

use kernel::error::repo::{RepoError, RepoResult};
use platform::database::Database;
use sqlx::PgPool;

use crate::domain::entities::Item;
use crate::domain::repository::ItemRepository;
use crate::domain::value_objects::ItemName;

/// PostgreSQL-backed item repository (`products` table)
#[derive(Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    name: String,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            name: row.name,
        }
    }
}

impl ItemRepository for PgItemRepository {
    async fn insert(&self, name: &ItemName) -> RepoResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products (name)
            VALUES ($1)
            RETURNING id
            "#,
        )
        .bind(name.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn select_all(&self) -> RepoResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn update(&self, id: i64, name: &ItemName) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $1
            WHERE id = $2
            "#,
        )
        .bind(name.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        RepoError::expect_rows(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        RepoError::expect_rows(result.rows_affected())
    }
}
