use hullsmith_core::catalog::{BlockCatalog, BlockDef};
use thiserror::Error;

use crate::validator::{validate_blocks, ValidationError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse blocks RON: {0}")]
    BlockParseError(String),
    #[error("Block catalog failed validation with {} error(s)", .0.len())]
    Invalid(Vec<ValidationError>),
}

/// Parse a single blocks RON string into a list of definitions.
pub fn load_blocks_from_str(ron_str: &str) -> Result<Vec<BlockDef>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::BlockParseError(e.to_string()))
}

/// Load and concatenate multiple block sources.
pub fn load_all_blocks(sources: &[&str]) -> Result<Vec<BlockDef>, LoadError> {
    let mut all_blocks = Vec::new();
    for source in sources {
        all_blocks.extend(load_blocks_from_str(source)?);
    }
    Ok(all_blocks)
}

/// Parse, validate and index a set of block sources.
pub fn load_catalog(sources: &[&str]) -> Result<BlockCatalog, LoadError> {
    let blocks = load_all_blocks(sources)?;
    validate_blocks(&blocks).map_err(LoadError::Invalid)?;
    log::debug!(
        "Loaded block catalog: {} definitions from {} source(s)",
        blocks.len(),
        sources.len()
    );
    Ok(BlockCatalog::new(blocks))
}
