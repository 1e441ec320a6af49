//! Infrastructure adapters for bootstrap ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod builtin_seed_loader;
mod in_memory_bootstrap_store;
mod postgres_bootstrap_store;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use builtin_seed_loader::{BuiltinSeedLoader, BuiltinSeedSource};
pub use in_memory_bootstrap_store::InMemoryBootstrapStore;
pub use postgres_bootstrap_store::PostgresBootstrapStore;
