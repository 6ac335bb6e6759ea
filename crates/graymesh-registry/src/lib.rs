mod error;
pub use error::{RegistryError, RegistryResult};

mod config;
pub use config::RegistryConfig;

mod backend;
pub use backend::{Registration, RegistryBackend};

mod cache;
pub use cache::ServiceCache;

mod client;
pub use client::RegistryClient;
