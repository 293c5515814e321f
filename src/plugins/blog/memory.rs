use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::blog::models::{BlogDto, BlogRecord, BlogStatus};
use crate::plugins::blog::store::{BlogStore, DynBlogStore};

/// In-process blog store. Rows are kept in insertion order.
#[derive(Default)]
pub struct MemoryBlogStore {
    rows: Mutex<Vec<BlogDto>>,
}

impl MemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_arc(self) -> DynBlogStore {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn newest_first<'a>(rows: impl DoubleEndedIterator<Item = &'a BlogDto>) -> Vec<BlogDto> {
        // reverse first so equal timestamps keep the later insert ahead after the stable sort
        let mut out: Vec<BlogDto> = rows.rev().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

#[async_trait]
impl BlogStore for MemoryBlogStore {
    async fn list_page(&self, skip: i64, take: i64) -> Result<(Vec<BlogDto>, i64), AppError> {
        let rows = self.rows.lock();
        let total = rows.len() as i64;
        let skip = usize::try_from(skip.max(0)).unwrap_or(usize::MAX);
        let take = usize::try_from(take.max(0)).unwrap_or(usize::MAX);
        let items = Self::newest_first(rows.iter()).into_iter().skip(skip).take(take).collect();
        Ok((items, total))
    }

    async fn list_active(&self) -> Result<Vec<BlogDto>, AppError> {
        let rows = self.rows.lock();
        Ok(Self::newest_first(rows.iter().filter(|b| b.status == BlogStatus::Active)))
    }

    async fn find_active(&self, key: &str) -> Result<Option<BlogDto>, AppError> {
        let id = Uuid::parse_str(key).ok();
        let rows = self.rows.lock();
        Ok(rows
            .iter()
            .find(|b| b.status == BlogStatus::Active && (Some(b.id) == id || b.slug == key))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogDto>, AppError> {
        Ok(self.rows.lock().iter().find(|b| b.id == id).cloned())
    }

    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        Ok(self.rows.lock().iter().any(|b| b.slug == slug && Some(b.id) != except))
    }

    async fn insert(&self, record: &BlogRecord) -> Result<BlogDto, AppError> {
        let mut rows = self.rows.lock();
        // mirrors the blogs_slug_key unique constraint
        if rows.iter().any(|b| b.slug == record.slug) {
            return Err(AppError::duplicate_slug());
        }
        let now = chrono::Utc::now();
        let dto = BlogDto {
            id: Uuid::new_v4(),
            name: record.name.clone(),
            slug: record.slug.clone(),
            description: record.description.clone(),
            category: record.category.clone(),
            image: record.image.clone(),
            status: record.status,
            created_at: now,
            updated_at: now,
        };
        rows.push(dto.clone());
        Ok(dto)
    }

    async fn update(&self, id: Uuid, record: &BlogRecord) -> Result<BlogDto, AppError> {
        let mut rows = self.rows.lock();
        if rows.iter().any(|b| b.slug == record.slug && b.id != id) {
            return Err(AppError::duplicate_slug());
        }
        let row = rows
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found("Blog not found"))?;
        row.name = record.name.clone();
        row.slug = record.slug.clone();
        row.description = record.description.clone();
        row.category = record.category.clone();
        row.image = record.image.clone();
        row.status = record.status;
        row.updated_at = chrono::Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        if rows.len() == before {
            return Err(AppError::not_found("Blog not found"));
        }
        Ok(())
    }
}
