//! Report store implementations

#[cfg(feature = "in-memory")]
pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "in-memory")]
pub use in_memory::InMemoryReportStore;
#[cfg(feature = "postgres")]
pub use postgres::{PostgresReportStore, connect_pool};
