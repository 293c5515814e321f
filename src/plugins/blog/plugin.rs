use axum::{Router, routing::get, Extension};
use crate::kernel::Plugin;
use crate::plugins::blog::handlers::*;
use crate::plugins::blog::repo::PgBlogStore;
use crate::plugins::blog::store::DynBlogStore;
use sqlx::PgPool;
use std::sync::Arc;

pub struct BlogPlugin { pub store: DynBlogStore }

impl BlogPlugin {
    pub fn new(store: DynBlogStore) -> Self { Self { store } }

    pub fn with_pool(pool: PgPool) -> Self { Self::new(Arc::new(PgBlogStore::new(pool))) }
}

#[async_trait::async_trait]
impl Plugin for BlogPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/get-blogs", get(list_blogs))
            .route("/blogs", get(list_active_blogs).post(create_blog).patch(update_blog))
            .route("/blogs/:id", get(get_blog).delete(delete_blog))
            .layer(Extension(self.store.clone()))
    }

    fn name(&self) -> &'static str { "api" }

    async fn on_shutdown(&self) {
        self.store.close().await;
    }
}
