//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, one file per key on native)
//! - Logger initialization

pub mod storage;

pub use storage::{KeyValueStore, MemoryStore, StorageError};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

/// Install the platform logger (safe to call more than once)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Install the platform logger (safe to call more than once)
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
