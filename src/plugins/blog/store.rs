use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::blog::models::{BlogDto, BlogRecord};

/// Persistence seam for blogs. Listings are ordered newest first.
#[async_trait]
pub trait BlogStore: Send + Sync + 'static {
    /// One page of all blogs plus the total count, read from a single snapshot.
    async fn list_page(&self, skip: i64, take: i64) -> Result<(Vec<BlogDto>, i64), AppError>;
    async fn list_active(&self) -> Result<Vec<BlogDto>, AppError>;
    /// Active blog whose id or slug equals `key`.
    async fn find_active(&self, key: &str) -> Result<Option<BlogDto>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogDto>, AppError>;
    /// Whether a blog other than `except` already owns `slug`.
    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, AppError>;
    async fn insert(&self, record: &BlogRecord) -> Result<BlogDto, AppError>;
    async fn update(&self, id: Uuid, record: &BlogRecord) -> Result<BlogDto, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    /// Releases backing resources on shutdown.
    async fn close(&self) {}
}

pub type DynBlogStore = Arc<dyn BlogStore>;
