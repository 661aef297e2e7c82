//! In-process aggregate store.
//!
//! Used when no database URL is configured and throughout the HTTP tests.
//! Each repository guards its map with a `tokio::sync::RwLock`; `apply`
//! holds the write lock across load, transition, and store, which makes it
//! atomic per aggregate.

mod user_store;
mod video_store;

pub use user_store::InMemoryUserRepository;
pub use video_store::InMemoryVideoRepository;
