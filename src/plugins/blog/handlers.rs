use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::blog::form::BlogForm;
use crate::plugins::blog::models::{BlogDto, BlogRecord, CreateBlog, UpdateBlog};
use crate::plugins::blog::pagination::Pagination;
use crate::plugins::blog::slug::slugify;
use crate::plugins::blog::store::DynBlogStore;
use crate::response::{Envelope, PageMeta};

const NOT_FOUND: &str = "Blog not found";

fn slug_for(name: &str) -> Result<String, AppError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::validation("Name must contain at least one letter or digit"));
    }
    Ok(slug)
}

/// Blogs can only exist under a UUID, so anything else is simply unknown.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::not_found(NOT_FOUND))
}

pub async fn list_blogs(
    Extension(store): Extension<DynBlogStore>,
    pagination: Pagination,
) -> Result<Json<Envelope<Vec<BlogDto>>>, AppError> {
    let (items, total) = store.list_page(pagination.skip, pagination.limit).await?;
    let meta = PageMeta::new(total, pagination.page, pagination.limit);
    Ok(Json(Envelope::ok("All blogs fetched successfully", items).with_meta(meta)))
}

pub async fn list_active_blogs(
    Extension(store): Extension<DynBlogStore>,
) -> Result<Json<Envelope<Vec<BlogDto>>>, AppError> {
    let items = store.list_active().await?;
    Ok(Json(Envelope::ok("Active blogs fetched successfully", items)))
}

pub async fn get_blog(
    Extension(store): Extension<DynBlogStore>,
    Path(key): Path<String>,
) -> Result<Json<Envelope<BlogDto>>, AppError> {
    let dto = store
        .find_active(key.trim())
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    Ok(Json(Envelope::ok("Blog fetched successfully", dto)))
}

pub async fn create_blog(
    Extension(store): Extension<DynBlogStore>,
    form: BlogForm,
) -> Result<(StatusCode, Json<Envelope<BlogDto>>), AppError> {
    let input: CreateBlog = form.parse()?;
    let slug = slug_for(&input.name)?;

    if store.slug_taken(&slug, None).await? {
        tracing::warn!(slug = %slug, "rejecting blog with duplicate slug");
        return Err(AppError::duplicate_slug());
    }

    let record = BlogRecord {
        name: input.name,
        slug,
        description: input.description,
        category: input.category,
        image: input.image,
        status: input.status.unwrap_or_default(),
    };
    let dto = store.insert(&record).await?;
    tracing::info!(blog_id = %dto.id, slug = %dto.slug, "blog created");

    Ok((StatusCode::CREATED, Json(Envelope::ok("Blog created successfully.", dto))))
}

pub async fn update_blog(
    Extension(store): Extension<DynBlogStore>,
    form: BlogForm,
) -> Result<Json<Envelope<BlogDto>>, AppError> {
    let raw_id = form.get("id").map(str::trim).unwrap_or_default();
    if raw_id.is_empty() {
        return Err(AppError::validation("Id is required!"));
    }
    let id = parse_id(raw_id)?;

    let input: UpdateBlog = form.parse()?;
    if store.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(NOT_FOUND));
    }

    let slug = slug_for(&input.name)?;
    if store.slug_taken(&slug, Some(id)).await? {
        tracing::warn!(blog_id = %id, slug = %slug, "rejecting rename onto an existing slug");
        return Err(AppError::duplicate_slug());
    }

    let record = BlogRecord {
        name: input.name,
        slug,
        description: input.description,
        category: input.category,
        image: input.image,
        status: input.status,
    };
    let dto = store.update(id, &record).await?;
    tracing::info!(blog_id = %dto.id, slug = %dto.slug, "blog updated");

    Ok(Json(Envelope::ok("Blog updated successfully.", dto)))
}

pub async fn delete_blog(
    Extension(store): Extension<DynBlogStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<()>>, AppError> {
    let id = parse_id(&raw_id)?;
    if store.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(NOT_FOUND));
    }
    store.delete(id).await?;
    tracing::info!(blog_id = %id, "blog deleted");

    Ok(Json(Envelope::message("Blog deleted successfully.")))
}
