//! Client-side session storage.

pub mod disk;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

pub use disk::DiskSessionStore;
pub use memory::MemorySessionStore;

/// Holds the bearer token between invocations. The backend decides when a
/// token stops being valid; nothing here expires it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_token(&self) -> Result<Option<String>>;
    async fn save_token(&self, token: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}
