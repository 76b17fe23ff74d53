mod in_memory_store;
mod pg_store;

pub use in_memory_store::InMemoryRateLimitStore;
pub use pg_store::PgRateLimitStore;
