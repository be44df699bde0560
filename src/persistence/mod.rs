//! Save/load persistence
//!
//! Features:
//! - Versioned JSON blob under a single storage key
//! - Lenient decoding of legacy save shapes (see `migration`)
//! - Corruption detection and recovery (corrupt data becomes a fresh save)

pub mod migration;
pub mod save;

pub use save::{CategoryProgress, SaveBlob, SaveError, SaveStore};
