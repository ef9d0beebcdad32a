use glam::IVec3;

use crate::constants::{BLOCK_WORD_MASK, ID_BITS, ID_OFFSET, LATEST_FORMAT_VERSION};
use crate::error::BlockError;
use crate::math::{bits_combine, bits_parse};

/// Newtype for block type identifiers. 0 = empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const EMPTY: BlockId = BlockId(0);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Voxel coordinate in blueprint space.
pub type Position = IVec3;

/// Origin of a segment: a position whose components are multiples of the side length.
pub type SegmentOrigin = IVec3;

/// Packed voxel word: 24 meaningful bits stored in a u32.
///
/// Bit layout (version dependent, see `FormatVersion`):
///   [0:11)   block id
///   [11:..)  durability, 9/8/7 bits
///   active   bit 19 before v3, bit 18 at v3 (only for activatable ids, 0 = active)
///   rest     orientation, meaning defined by the block's style
///
/// An empty voxel (id 0) is always the all-zero word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PackedBlock(pub u32);

impl PackedBlock {
    pub const EMPTY: PackedBlock = PackedBlock(0);

    /// Wrap a raw word, dropping the 8 unused high bits.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw & BLOCK_WORD_MASK)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Block id; its position does not depend on the format version.
    pub fn id(self) -> BlockId {
        BlockId(bits_parse(self.0, ID_OFFSET, ID_BITS) as u16)
    }

    pub fn is_empty(self) -> bool {
        self.id().is_empty()
    }

    /// Read `len` bits starting at `offset`.
    pub fn bits(self, offset: u32, len: u32) -> u32 {
        bits_parse(self.0, offset, len)
    }

    /// Replace `len` bits starting at `offset`, leaving every other bit intact.
    pub fn with_bits(self, value: u32, offset: u32, len: u32) -> Self {
        Self(bits_combine(self.0, value, offset, len))
    }
}

/// Block format version stored in every segment header.
///
/// Only versions 0..=3 exist; construction rejects anything else so the codec
/// never has to handle an unknown layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion(u8);

impl FormatVersion {
    pub const V0: FormatVersion = FormatVersion(0);
    pub const V1: FormatVersion = FormatVersion(1);
    pub const V2: FormatVersion = FormatVersion(2);
    pub const V3: FormatVersion = FormatVersion(3);
    pub const LATEST: FormatVersion = FormatVersion(LATEST_FORMAT_VERSION);

    pub const ALL: [FormatVersion; 4] = [Self::V0, Self::V1, Self::V2, Self::V3];

    pub fn new(version: u8) -> Result<Self, BlockError> {
        if version > LATEST_FORMAT_VERSION {
            return Err(BlockError::InvalidVersion(version));
        }
        Ok(Self(version))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Versions before 3 share the older orientation and active-bit layout.
    pub fn is_legacy(self) -> bool {
        self.0 < 3
    }

    /// Width of the durability field.
    pub fn durability_bits(self) -> u32 {
        match self.0 {
            0 | 1 => 9,
            2 => 8,
            _ => 7,
        }
    }

    /// Largest durability the field can hold.
    pub fn max_durability(self) -> u16 {
        ((1u32 << self.durability_bits()) - 1) as u16
    }

    /// Bit holding the inverted active flag.
    pub fn active_bit(self) -> u32 {
        if self.is_legacy() {
            19
        } else {
            18
        }
    }
}

impl TryFrom<u8> for FormatVersion {
    type Error = BlockError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FormatVersion> for u8 {
    fn from(version: FormatVersion) -> Self {
        version.0
    }
}
