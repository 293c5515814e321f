use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "blog_status", rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Active,
    Inactive,
}

/// Body accepted by `POST /api/blogs`. `status` falls back to active.
#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct CreateBlog {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 10, message = "Image must be at least 10 characters"))]
    pub image: String,
    pub status: Option<BlogStatus>,
}

/// Body accepted by `PATCH /api/blogs`: a full overwrite of the record named by `id`.
#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct UpdateBlog {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 10, message = "Image must be at least 10 characters"))]
    pub image: String,
    pub status: BlogStatus,
}

/// Column values written on insert and update.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogRecord {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub status: BlogStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogDto {
    pub id: uuid::Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub status: BlogStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
