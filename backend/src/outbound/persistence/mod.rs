//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain aggregates and hold
//! no business rules. Row structs (`models.rs`) and the table definitions
//! (`schema.rs`) stay private to this module.
//!
//! Every `apply` runs in a single transaction that locks the aggregate row
//! with `SELECT ... FOR UPDATE`, so concurrent transitions on one aggregate
//! serialise while different aggregates proceed in parallel.
//!
//! # Example
//!
//! ```ignore
//! use vidshare::outbound::persistence::{DbPool, DieselVideoRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/vidshare")).await?;
//! let videos = DieselVideoRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_user_repository;
mod diesel_video_repository;
mod membership_diff;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use diesel_video_repository::DieselVideoRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
