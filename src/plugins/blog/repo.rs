use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::blog::models::{BlogDto, BlogRecord};
use crate::plugins::blog::store::BlogStore;

const BLOG_COLUMNS: &str = "id, name, slug, description, category, image, status, created_at, updated_at";

/// PostgreSQL backed [`BlogStore`].
#[derive(Clone)]
pub struct PgBlogStore {
    pool: PgPool,
}

impl PgBlogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogStore for PgBlogStore {
    async fn list_page(&self, skip: i64, take: i64) -> Result<(Vec<BlogDto>, i64), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        let items: Vec<BlogDto> = sqlx::query_as::<_, BlogDto>(&format!(
            "SELECT {} FROM blogs ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            BLOG_COLUMNS
        ))
        .bind(take)
        .bind(skip)
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::from)?;

        let total: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blogs")
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok((items, total))
    }

    async fn list_active(&self) -> Result<Vec<BlogDto>, AppError> {
        let items = sqlx::query_as::<_, BlogDto>(&format!(
            "SELECT {} FROM blogs WHERE status = 'active' ORDER BY created_at DESC",
            BLOG_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(items)
    }

    async fn find_active(&self, key: &str) -> Result<Option<BlogDto>, AppError> {
        // a key that is not a UUID can only match by slug
        let id = Uuid::parse_str(key).ok();
        let dto = sqlx::query_as::<_, BlogDto>(&format!(
            "SELECT {} FROM blogs WHERE status = 'active' AND (id = $1 OR slug = $2) LIMIT 1",
            BLOG_COLUMNS
        ))
        .bind(id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(dto)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogDto>, AppError> {
        let dto = sqlx::query_as::<_, BlogDto>(&format!("SELECT {} FROM blogs WHERE id = $1", BLOG_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(dto)
    }

    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM blogs WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(except)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(taken)
    }

    async fn insert(&self, record: &BlogRecord) -> Result<BlogDto, AppError> {
        let dto = sqlx::query_as::<_, BlogDto>(&format!(
            "INSERT INTO blogs (name, slug, description, category, image, status) VALUES ($1,$2,$3,$4,$5,$6) RETURNING {}",
            BLOG_COLUMNS
        ))
        .bind(&record.name)
        .bind(&record.slug)
        .bind(&record.description)
        .bind(&record.category)
        .bind(&record.image)
        .bind(record.status)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(dto)
    }

    async fn update(&self, id: Uuid, record: &BlogRecord) -> Result<BlogDto, AppError> {
        let dto = sqlx::query_as::<_, BlogDto>(&format!(
            "UPDATE blogs SET name = $1, slug = $2, description = $3, category = $4, image = $5, status = $6, updated_at = now() WHERE id = $7 RETURNING {}",
            BLOG_COLUMNS
        ))
        .bind(&record.name)
        .bind(&record.slug)
        .bind(&record.description)
        .bind(&record.category)
        .bind(&record.image)
        .bind(record.status)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(dto)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Blog not found"));
        }
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}
