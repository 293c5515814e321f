pub mod form;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod pagination;
pub mod plugin;
pub mod repo;
pub mod slug;
pub mod store;

pub use memory::MemoryBlogStore;
pub use models::*;
pub use plugin::BlogPlugin;
pub use repo::PgBlogStore;
pub use store::{BlogStore, DynBlogStore};
