use crate::kernel::Plugin;
use axum::{Json, Router, routing::get};
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    success: bool,
    message: &'static str,
    time: String,
}

pub struct HealthPlugin;

async fn liveness_handler() -> &'static str {
    "Server is Running"
}

#[axum::debug_handler]
async fn health_handler() -> Json<Health> {
    // e.g. "Mon Oct 19 2026"
    let time = chrono::Utc::now().format("%a %b %d %Y").to_string();
    Json(Health { success: true, message: "Server Running.", time })
}

#[async_trait::async_trait]
impl Plugin for HealthPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", get(liveness_handler))
            .route("/health", get(health_handler))
    }

    fn name(&self) -> &'static str {
        "health"
    }

    fn mount_path(&self) -> String {
        "/".to_string()
    }

    async fn on_start(&self) {
        tracing::info!("health plugin started");
    }
}
