use glam::IVec3;
use hullsmith_core::constants::{SEGMENT_RECORD_SIZE, SEGMENT_SIDE, VOXEL_BYTES};
use hullsmith_core::types::SegmentOrigin;
use serde::{Deserialize, Serialize};

use crate::error::PersistError;

/// Header size with the leading version byte.
pub const HEADER_SIZE: usize = 26;

/// Header size of version-0 regions, which omit the version byte.
pub const HEADER_SIZE_NO_VERSION: usize = 25;

/// Largest accepted segment side length. A 128^3 segment is already far
/// more than one record can hold once compressed.
pub const MAX_SIDE_LENGTH: u32 = 128;

/// Segment layout parameters, fixed per region format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Voxels along each edge of a segment.
    pub side_length: u32,
    /// Whether each record starts with a block format version byte.
    pub has_version_byte: bool,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            side_length: SEGMENT_SIDE,
            has_version_byte: true,
        }
    }
}

impl SegmentConfig {
    pub fn new(side_length: u32, has_version_byte: bool) -> Self {
        Self {
            side_length,
            has_version_byte,
        }
    }

    /// Reject side lengths of zero or above `MAX_SIDE_LENGTH`.
    pub fn validate(&self) -> Result<(), PersistError> {
        if self.side_length == 0 || self.side_length > MAX_SIDE_LENGTH {
            return Err(PersistError::InvalidSideLength(self.side_length));
        }
        Ok(())
    }

    /// Voxels per segment (L^3). Saturates for configs that fail `validate`.
    pub fn voxel_count(&self) -> usize {
        let side = self.side_length as usize;
        side.saturating_mul(side).saturating_mul(side)
    }

    /// Uncompressed payload length in bytes.
    pub fn payload_len(&self) -> usize {
        self.voxel_count().saturating_mul(VOXEL_BYTES)
    }

    pub fn header_size(&self) -> usize {
        if self.has_version_byte {
            HEADER_SIZE
        } else {
            HEADER_SIZE_NO_VERSION
        }
    }

    /// Bytes available for the compressed payload inside one record.
    pub fn data_capacity(&self) -> usize {
        SEGMENT_RECORD_SIZE - self.header_size()
    }
}

/// Fixed segment record header. All integers are big-endian.
///
/// Layout: `[version: u8]? [timestamp: u64] [origin: 3 x i32] [valid: u8]
/// [compressed_size: u32]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Raw block format version. 0 when the record has no version byte.
    pub version: u8,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub origin: SegmentOrigin,
    pub valid: bool,
    pub compressed_size: u32,
}

fn be_array<const N: usize>(bytes: &[u8], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[at..at + N]);
    out
}

impl SegmentHeader {
    /// Parse the header at the start of `bytes`.
    pub fn parse(bytes: &[u8], config: &SegmentConfig) -> Result<Self, PersistError> {
        let size = config.header_size();
        if bytes.len() < size {
            return Err(PersistError::TruncatedRecord {
                expected: size,
                actual: bytes.len(),
            });
        }
        let mut at = 0;
        let version = if config.has_version_byte {
            at += 1;
            // Some writers stored the version as a negative signed byte
            (bytes[0] as i8).unsigned_abs()
        } else {
            0
        };
        let timestamp = u64::from_be_bytes(be_array(bytes, at));
        at += 8;
        let x = i32::from_be_bytes(be_array(bytes, at));
        let y = i32::from_be_bytes(be_array(bytes, at + 4));
        let z = i32::from_be_bytes(be_array(bytes, at + 8));
        at += 12;
        let valid = bytes[at] != 0;
        at += 1;
        let compressed_size = u32::from_be_bytes(be_array(bytes, at));
        Ok(Self {
            version,
            timestamp,
            origin: IVec3::new(x, y, z),
            valid,
            compressed_size,
        })
    }

    /// Append the serialized header to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>, config: &SegmentConfig) {
        if config.has_version_byte {
            out.push(self.version);
        }
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.origin.x.to_be_bytes());
        out.extend_from_slice(&self.origin.y.to_be_bytes());
        out.extend_from_slice(&self.origin.z.to_be_bytes());
        out.push(u8::from(self.valid));
        out.extend_from_slice(&self.compressed_size.to_be_bytes());
    }
}
