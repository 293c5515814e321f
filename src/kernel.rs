use std::any::Any;

use async_trait::async_trait;
use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::http_error::AppError;

#[async_trait]
pub trait Plugin: Send + Sync {
    async fn router(&self) -> Router;

    fn name(&self) -> &'static str;

    /// Path the plugin router is mounted under. `/` merges it into the root.
    fn mount_path(&self) -> String {
        format!("/{}", self.name())
    }

    /// Optional lifecycle hook called when the kernel starts.
    async fn on_start(&self) {}
    /// Optional lifecycle hook called after the server stopped accepting requests.
    async fn on_shutdown(&self) {}
}

/// Builds the application router by mounting each plugin under its
/// `mount_path`, then wraps it in CORS, request tracing and panic catching.
pub async fn build_app(plugins: &[Box<dyn Plugin>], cors_origins: &[HeaderValue]) -> Router {
    let mut app = Router::new();

    for plugin in plugins.iter() {
        info!("starting plugin {}", plugin.name());
        plugin.on_start().await;
        let router = plugin.router().await;
        let path = plugin.mount_path();
        app = if path == "/" { app.merge(router) } else { app.nest(&path, router) };
    }

    app.fallback(route_not_found)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

pub fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins.to_vec())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Runs every plugin's shutdown hook in mount order.
pub async fn shutdown_plugins(plugins: &[Box<dyn Plugin>]) {
    for plugin in plugins.iter() {
        info!("stopping plugin {}", plugin.name());
        plugin.on_shutdown().await;
    }
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");
    AppError::internal("Internal Server Error").into_response()
}
