//! Production implementations of the repository interfaces.

pub mod postgres;
pub mod redis;

pub use postgres::PgAuthStore;
pub use redis::RedisRevocationList;
