use hullsmith_core::error::BlockError;
use hullsmith_core::types::{Position, SegmentOrigin};

/// Why a segment payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorruptReason {
    #[error("zlib decompression failed: {0}")]
    Inflate(String),

    #[error("payload of {0} bytes is not a whole number of 3-byte words")]
    PartialWord(usize),

    #[error("payload holds {actual} bytes, expected {expected}")]
    WrongSize { expected: usize, actual: usize },

    #[error("compressed size {size} exceeds the {capacity}-byte data area")]
    Oversized { size: usize, capacity: usize },
}

/// Errors that can occur while reading or writing segment records.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("corrupt segment at {origin}: {reason}")]
    CorruptSegment {
        origin: SegmentOrigin,
        reason: CorruptReason,
    },

    #[error("compressed segment at {origin} needs {size} bytes, only {capacity} available")]
    SegmentOverflow {
        origin: SegmentOrigin,
        size: usize,
        capacity: usize,
    },

    #[error("segment origin {origin} is not a multiple of {side}")]
    MisalignedSegment { origin: SegmentOrigin, side: u32 },

    #[error("segment side length {0} is outside 1..={max}", max = crate::format::MAX_SIDE_LENGTH)]
    InvalidSideLength(u32),

    #[error("position {position} lies outside the segment at {origin}")]
    OutsideSegment {
        position: Position,
        origin: SegmentOrigin,
    },

    #[error("truncated segment record: expected {expected} bytes, got {actual}")]
    TruncatedRecord { expected: usize, actual: usize },

    #[error("unsupported block format version {0}")]
    UnsupportedVersion(u8),

    #[error("zlib compression failed: {0}")]
    Compress(String),

    #[error(transparent)]
    Block(#[from] BlockError),
}
