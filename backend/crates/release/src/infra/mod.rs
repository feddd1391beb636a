//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryReleaseRepository;
pub use postgres::PgReleaseRepository;
