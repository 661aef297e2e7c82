//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: in-process aggregate stores used when no database is set
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **auth**: JWT bearer credential verification
//! - **media**: filesystem media storage
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod auth;
pub mod media;
pub mod memory;
pub mod persistence;
