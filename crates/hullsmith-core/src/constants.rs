//! Single source of truth for shared constants.
//! Bit offsets here describe the packed 24-bit block word; the per-version
//! durability and active-bit positions live on `FormatVersion`.

/// Number of meaningful bits in a packed block word.
pub const BLOCK_WORD_BITS: u32 = 24;

/// Mask selecting the 24 meaningful bits of a packed block word.
pub const BLOCK_WORD_MASK: u32 = (1 << BLOCK_WORD_BITS) - 1;

/// First bit of the block id field.
pub const ID_OFFSET: u32 = 0;

/// Width of the block id field.
pub const ID_BITS: u32 = 11;

/// Largest representable block id (2^11 - 1). Id 0 = empty.
pub const MAX_BLOCK_ID: u16 = (1 << ID_BITS) - 1;

/// First bit of the durability field in every format version.
pub const DURABILITY_OFFSET: u32 = 11;

/// Oldest supported block format version.
pub const MIN_FORMAT_VERSION: u8 = 0;

/// Newest supported block format version.
pub const LATEST_FORMAT_VERSION: u8 = 3;

/// Number of shape styles known to the codec (0..=6).
pub const STYLE_COUNT: usize = 7;

/// Number of distinct block faces.
pub const FACE_COUNT: usize = 6;

/// Smallest coordinate a spatial index key may carry (i16::MIN).
pub const MIN_COORD: i32 = i16::MIN as i32;

/// Largest coordinate a spatial index key may carry (i16::MAX).
pub const MAX_COORD: i32 = i16::MAX as i32;

/// Canonical segment side length in voxels.
pub const SEGMENT_SIDE: u32 = 32;

/// Fixed on-disk size of one segment record in bytes.
pub const SEGMENT_RECORD_SIZE: usize = 5120;

/// Bytes per serialized voxel word inside a segment payload (big-endian u24).
pub const VOXEL_BYTES: usize = 3;
