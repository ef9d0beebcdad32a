//! Built-in block catalog embedded from `data/blocks`.

use hullsmith_core::catalog::BlockCatalog;

use crate::loader::{load_catalog, LoadError};

/// Hull and armor blocks in every tier, color and shape.
pub const HULL_BLOCKS: &str = include_str!("../../../data/blocks/hull.ron");

/// Functional blocks, including rail equivalents.
pub const SYSTEM_BLOCKS: &str = include_str!("../../../data/blocks/systems.ron");

/// Every embedded block source, in load order.
pub const BUILTIN_SOURCES: [&str; 2] = [HULL_BLOCKS, SYSTEM_BLOCKS];

/// Parse and validate the embedded block data.
pub fn builtin_catalog() -> Result<BlockCatalog, LoadError> {
    load_catalog(&BUILTIN_SOURCES)
}
