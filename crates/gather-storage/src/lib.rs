// Postgres storage layer with sqlx
//
// This crate provides database implementations for core traits:
// - PgRegistrationStore: implements RegistrationStore with per-event row
//   locking (the ledger's linearizability contract)
// - MemoryRegistrationStore: same semantics behind one mutex, for tests
// - Database: plain CRUD repositories for the remaining entities

pub mod memory;
pub mod models;
pub mod registrations;
pub mod repositories;

pub use memory::MemoryRegistrationStore;
pub use models::*;
pub use registrations::PgRegistrationStore;
pub use repositories::Database;
