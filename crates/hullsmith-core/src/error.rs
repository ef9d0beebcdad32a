use thiserror::Error;

use crate::types::Position;

/// Errors raised by the block codec, the spatial index and the periphery analyzer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("unsupported block format version {0}")]
    InvalidVersion(u8),

    #[error("unknown block style {0}")]
    InvalidStyle(u8),

    #[error("orientation {value} is not valid for style {style}")]
    InvalidOrientation { style: u8, value: u32 },

    #[error("block id {0} is not in the catalog")]
    UnknownBlockId(u16),

    #[error("flood seed {0} does not satisfy the traversal precondition")]
    InvalidSeed(Position),

    #[error("no block at position {0}")]
    NotFound(Position),

    #[error("position {0} does not fit in 16-bit coordinates")]
    PositionOutOfRange(Position),

    #[error("openness test needs a non-empty border set")]
    EmptyBorder,

    #[error("no hull block for tier {tier}, color {color}, shape {shape}")]
    NoHullVariant { tier: u8, color: u8, shape: String },
}
