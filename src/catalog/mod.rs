//! Question content catalog
//!
//! Loaded once at boot and immutable afterwards. Everything downstream sees
//! normalized categories with explicit levels.

pub mod loader;
pub mod model;
pub mod registry;

pub use loader::{CatalogError, parse_bank};
pub use model::{Category, Level, LevelSource, Question};
pub use registry::ContentCatalog;
