#![allow(dead_code)]

use std::process::Command;

use axum::http::HeaderValue;
use blog_api_kernel::db;
use blog_api_kernel::kernel::{build_app, Plugin};
use blog_api_kernel::plugins::blog::{BlogPlugin, DynBlogStore, MemoryBlogStore};
use blog_api_kernel::plugins::health::HealthPlugin;
use tokio::net::TcpListener;

pub const ALLOWED_ORIGIN: &str = "http://localhost:8800";

pub struct TestDbGuard {
    maintenance_url: String,
    unique_db: String,
}

impl TestDbGuard {
    pub fn new(maintenance_url: String, unique_db: String) -> Self {
        Self { maintenance_url, unique_db }
    }
}

impl Drop for TestDbGuard {
    fn drop(&mut self) {
        let _ = Command::new("psql")
            .arg(&self.maintenance_url)
            .arg("-c")
            .arg(format!(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}' AND pid <> pg_backend_pid();",
                self.unique_db
            ))
            .status();
        let _ = Command::new("psql")
            .arg(&self.maintenance_url)
            .arg("-c")
            .arg(format!("DROP DATABASE IF EXISTS \"{}\"", self.unique_db))
            .status();
    }
}

/// `TEST_DATABASE_URL`, or `None` when PostgreSQL tests should be skipped.
pub fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok().filter(|s| !s.trim().is_empty())
}

/// Creates a throwaway database next to `test_db` and runs migrations in it.
pub async fn create_test_db_and_pool(test_db: &str) -> anyhow::Result<(sqlx::PgPool, TestDbGuard)> {
    let mut maintenance_url = test_db.to_string();
    if let Some(idx) = maintenance_url.rfind('/') {
        maintenance_url.replace_range(idx + 1.., "postgres");
    }
    let base_db_name = test_db.rsplit('/').next().unwrap().split('?').next().unwrap();
    let unique_db = format!("{}_{}", base_db_name, uuid::Uuid::new_v4().to_string().replace('-', ""));
    let mut unique_db_url = test_db.to_string();
    if let Some(idx) = unique_db_url.rfind('/') {
        unique_db_url.replace_range(idx + 1.., &unique_db);
    }

    let maint_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&maintenance_url)
        .await?;
    sqlx::query(&format!("CREATE DATABASE \"{}\"", unique_db))
        .execute(&maint_pool)
        .await?;
    maint_pool.close().await;

    let guard = TestDbGuard::new(maintenance_url, unique_db);
    let pool = db::init_db(&unique_db_url, 5).await?;
    Ok((pool, guard))
}

pub async fn spawn_app_with_plugins(plugins: Vec<Box<dyn Plugin>>) -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    let app = build_app(&plugins, &[HeaderValue::from_static(ALLOWED_ORIGIN)]).await;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });
    Ok((format!("http://{}", addr), server_handle))
}

/// Health + blog plugins backed by a store.
pub async fn spawn_blog_app(store: DynBlogStore) -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(HealthPlugin), Box::new(BlogPlugin::new(store))];
    spawn_app_with_plugins(plugins).await
}

pub async fn spawn_memory_app() -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    spawn_blog_app(MemoryBlogStore::new().into_arc()).await
}

pub fn blog_fields(name: &str) -> serde_json::Value {
    serde_json::json!({"name": name, "description": "d", "category": "c", "image": "0123456789"})
}
