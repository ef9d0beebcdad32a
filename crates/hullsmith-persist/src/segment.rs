use hullsmith_core::constants::SEGMENT_RECORD_SIZE;
use hullsmith_core::math::{index_to_position, is_segment_aligned, local_index, segment_origin};
use hullsmith_core::types::{FormatVersion, PackedBlock, Position, SegmentOrigin};
use hullsmith_grid::block_list::BlockList;

use crate::compat;
use crate::compress;
use crate::error::PersistError;
use crate::format::{SegmentConfig, SegmentHeader};

/// One cube of `L^3` voxel words, the unit of compression and storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub version: FormatVersion,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    origin: SegmentOrigin,
    side: u32,
    /// Validity flag as read or last written. `false` = no data stored.
    valid: bool,
    blocks: Vec<PackedBlock>,
    /// Compatibility warnings produced while reading this segment.
    pub warnings: Vec<String>,
}

impl Segment {
    /// Create an empty segment. `origin` must be a multiple of the side length.
    pub fn new(
        origin: SegmentOrigin,
        version: FormatVersion,
        config: &SegmentConfig,
    ) -> Result<Self, PersistError> {
        config.validate()?;
        check_alignment(origin, config.side_length)?;
        Ok(Self {
            version,
            timestamp: 0,
            origin,
            side: config.side_length,
            valid: false,
            blocks: vec![PackedBlock::EMPTY; config.voxel_count()],
            warnings: Vec::new(),
        })
    }

    /// Parse one fixed-size record.
    ///
    /// An invalid flag skips the payload entirely. A valid record whose
    /// payload decodes to no blocks is downgraded to invalid.
    pub fn read(buffer: &[u8], config: &SegmentConfig) -> Result<Self, PersistError> {
        config.validate()?;
        if buffer.len() < SEGMENT_RECORD_SIZE {
            return Err(PersistError::TruncatedRecord {
                expected: SEGMENT_RECORD_SIZE,
                actual: buffer.len(),
            });
        }
        let header = SegmentHeader::parse(buffer, config)?;
        let warnings = compat::validate_header(&header, config)?;
        let version = FormatVersion::try_from(header.version)
            .map_err(|_| PersistError::UnsupportedVersion(header.version))?;
        check_alignment(header.origin, config.side_length)?;

        let mut segment = Self {
            version,
            timestamp: header.timestamp,
            origin: header.origin,
            side: config.side_length,
            valid: header.valid,
            blocks: vec![PackedBlock::EMPTY; config.voxel_count()],
            warnings,
        };
        if !header.valid {
            return Ok(segment);
        }

        let start = config.header_size();
        let end = start + header.compressed_size as usize;
        segment.blocks = compress::decompress_payload(&buffer[start..end], config.voxel_count())
            .map_err(|reason| PersistError::CorruptSegment {
                origin: header.origin,
                reason,
            })?;
        if segment.block_count() == 0 {
            log::debug!("Segment {} flagged valid but empty", header.origin);
            segment.valid = false;
        }
        Ok(segment)
    }

    /// Serialize into one fixed-size record, zero padded.
    /// The validity flag is derived from the content.
    pub fn write(&self, config: &SegmentConfig) -> Result<Vec<u8>, PersistError> {
        config.validate()?;
        check_alignment(self.origin, config.side_length)?;
        if config.side_length != self.side {
            return Err(PersistError::MisalignedSegment {
                origin: self.origin,
                side: config.side_length,
            });
        }
        let valid = self.block_count() > 0;
        let payload = if valid {
            compress::compress_payload(&compress::pack_words(&self.blocks))?
        } else {
            Vec::new()
        };
        let capacity = config.data_capacity();
        if payload.len() > capacity {
            return Err(PersistError::SegmentOverflow {
                origin: self.origin,
                size: payload.len(),
                capacity,
            });
        }

        let header = SegmentHeader {
            version: self.version.get(),
            timestamp: self.timestamp,
            origin: self.origin,
            valid,
            compressed_size: payload.len() as u32,
        };
        let mut out = Vec::with_capacity(SEGMENT_RECORD_SIZE);
        header.write_to(&mut out, config);
        out.extend_from_slice(&payload);
        out.resize(SEGMENT_RECORD_SIZE, 0);
        Ok(out)
    }

    pub fn origin(&self) -> SegmentOrigin {
        self.origin
    }

    pub fn side_length(&self) -> u32 {
        self.side
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn contains_position(&self, position: Position) -> bool {
        segment_origin(position, self.side) == self.origin
    }

    /// Flat index of `position`, taken modulo the side length per axis.
    pub fn local_index(&self, position: Position) -> usize {
        local_index(position, self.side)
    }

    /// Global position of flat index `index`.
    pub fn position(&self, index: usize) -> Position {
        index_to_position(self.origin, index, self.side)
    }

    pub fn get(&self, position: Position) -> PackedBlock {
        if !self.contains_position(position) {
            return PackedBlock::EMPTY;
        }
        self.blocks[self.local_index(position)]
    }

    /// Store `block` at a position inside this segment. With `replace` unset
    /// an occupied voxel is kept. Returns whether the voxel changed.
    pub fn add(
        &mut self,
        position: Position,
        block: PackedBlock,
        replace: bool,
    ) -> Result<bool, PersistError> {
        if !self.contains_position(position) {
            return Err(PersistError::OutsideSegment {
                position,
                origin: self.origin,
            });
        }
        let index = self.local_index(position);
        let slot = &mut self.blocks[index];
        if !replace && !slot.is_empty() {
            log::debug!("Kept existing block at {}", position);
            return Ok(false);
        }
        *slot = block;
        if !block.is_empty() {
            self.valid = true;
        }
        Ok(true)
    }

    /// Number of non-empty voxels.
    pub fn block_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_empty()).count()
    }

    /// Non-empty voxels with their global positions, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, PackedBlock)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| !block.is_empty())
            .map(|(index, &block)| (self.position(index), block))
    }

    /// Copy every non-empty voxel into `list`. Returns how many were copied.
    pub fn insert_into(&self, list: &mut BlockList) -> Result<usize, PersistError> {
        let mut count = 0;
        for (position, block) in self.iter() {
            list.set(position, block)?;
            count += 1;
        }
        Ok(count)
    }
}

fn check_alignment(origin: SegmentOrigin, side: u32) -> Result<(), PersistError> {
    if side == 0 || !is_segment_aligned(origin, side) {
        return Err(PersistError::MisalignedSegment { origin, side });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CorruptReason;
    use glam::IVec3;

    fn small() -> SegmentConfig {
        SegmentConfig::new(4, true)
    }

    fn hull() -> PackedBlock {
        PackedBlock::from_raw(598 | (75 << 11))
    }

    #[test]
    fn test_single_voxel_at_index_5() {
        let config = small();
        let origin = IVec3::new(4, 0, -8);
        let mut segment = Segment::new(origin, FormatVersion::V3, &config).expect("aligned");
        let position = segment.position(5);
        assert_eq!(position, origin + IVec3::new(1, 1, 0));
        assert!(segment.add(position, hull(), true).expect("inside"));

        let bytes = segment.write(&config).expect("should fit");
        assert_eq!(bytes.len(), SEGMENT_RECORD_SIZE);

        let read = Segment::read(&bytes, &config).expect("should read");
        assert!(read.is_valid());
        let blocks: Vec<(Position, PackedBlock)> = read.iter().collect();
        assert_eq!(blocks, vec![(position, hull())]);
        assert_eq!(read.local_index(position), 5);
        assert_eq!(read.origin(), origin);
        assert_eq!(read.version, FormatVersion::V3);
    }

    #[test]
    fn test_empty_segment_is_invalid() {
        let config = small();
        let segment = Segment::new(IVec3::ZERO, FormatVersion::V2, &config).expect("aligned");
        let bytes = segment.write(&config).expect("should fit");
        // valid flag byte and zero compressed size
        assert_eq!(bytes[21], 0);
        assert_eq!(&bytes[22..26], &[0, 0, 0, 0]);
        assert!(bytes[26..].iter().all(|&b| b == 0));

        let read = Segment::read(&bytes, &config).expect("should read");
        assert!(!read.is_valid());
        assert_eq!(read.block_count(), 0);
    }

    #[test]
    fn test_valid_but_empty_is_downgraded() {
        let config = small();
        let payload = compress::compress_payload(&vec![0u8; config.payload_len()]).expect("compress");
        let header = SegmentHeader {
            version: 3,
            timestamp: 0,
            origin: IVec3::ZERO,
            valid: true,
            compressed_size: payload.len() as u32,
        };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes, &config);
        bytes.extend_from_slice(&payload);
        bytes.resize(SEGMENT_RECORD_SIZE, 0);

        let read = Segment::read(&bytes, &config).expect("should read");
        assert!(!read.is_valid());
    }

    #[test]
    fn test_invalid_flag_skips_payload() {
        let config = small();
        let header = SegmentHeader {
            version: 3,
            timestamp: 0,
            origin: IVec3::ZERO,
            valid: false,
            compressed_size: 0,
        };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes, &config);
        // Garbage where a payload would be must not be looked at
        bytes.extend_from_slice(&[0xAB; 64]);
        bytes.resize(SEGMENT_RECORD_SIZE, 0);
        let read = Segment::read(&bytes, &config).expect("should read");
        assert_eq!(read.block_count(), 0);
    }

    #[test]
    fn test_full_roundtrip_default_side() {
        let config = SegmentConfig::default();
        let origin = IVec3::new(32, -32, 0);
        let mut segment = Segment::new(origin, FormatVersion::V3, &config).expect("aligned");
        segment.timestamp = 1_500_000_000_000;
        for i in 0..32 {
            let position = origin + IVec3::new(i, (i * 7) % 32, (i * 13) % 32);
            segment
                .add(position, PackedBlock::from_raw(598 + i as u32), true)
                .expect("inside");
        }
        let bytes = segment.write(&config).expect("should fit");
        let read = Segment::read(&bytes, &config).expect("should read");
        assert_eq!(read.block_count(), 32);
        assert_eq!(read.timestamp, segment.timestamp);
        let expected: Vec<_> = segment.iter().collect();
        let actual: Vec<_> = read.iter().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_without_version_byte() {
        let config = SegmentConfig::new(4, false);
        let mut segment = Segment::new(IVec3::ZERO, FormatVersion::V0, &config).expect("aligned");
        segment.add(IVec3::new(3, 3, 3), hull(), true).expect("inside");
        let bytes = segment.write(&config).expect("should fit");
        let read = Segment::read(&bytes, &config).expect("should read");
        assert_eq!(read.version, FormatVersion::V0);
        assert_eq!(read.get(IVec3::new(3, 3, 3)), hull());
    }

    #[test]
    fn test_corrupt_payload() {
        let config = small();
        let header = SegmentHeader {
            version: 3,
            timestamp: 0,
            origin: IVec3::ZERO,
            valid: true,
            compressed_size: 8,
        };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes, &config);
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        bytes.resize(SEGMENT_RECORD_SIZE, 0);
        let result = Segment::read(&bytes, &config);
        assert!(matches!(
            result,
            Err(PersistError::CorruptSegment {
                reason: CorruptReason::Inflate(_),
                ..
            })
        ));
    }

    #[test]
    fn test_payload_for_wrong_side_rejected() {
        // Written with side 4, read back as side 8
        let mut segment = Segment::new(IVec3::ZERO, FormatVersion::V3, &small()).expect("aligned");
        segment.add(IVec3::ONE, hull(), true).expect("inside");
        let bytes = segment.write(&small()).expect("should fit");
        let result = Segment::read(&bytes, &SegmentConfig::new(8, true));
        assert!(matches!(
            result,
            Err(PersistError::CorruptSegment {
                reason: CorruptReason::WrongSize { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_overflow_rejected() {
        // Incompressible content cannot fit a 32^3 segment into one record
        let config = SegmentConfig::default();
        let mut segment = Segment::new(IVec3::ZERO, FormatVersion::V3, &config).expect("aligned");
        let mut state = 0x1234_5678u32;
        for index in 0..config.voxel_count() {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let position = segment.position(index);
            segment
                .add(position, PackedBlock::from_raw(1 + (state & 0x7F_FFFF) % 0xFF_FFFE), true)
                .expect("inside");
        }
        assert!(matches!(
            segment.write(&config),
            Err(PersistError::SegmentOverflow { .. })
        ));
    }

    #[test]
    fn test_unusable_side_length_rejected() {
        let record = [0u8; SEGMENT_RECORD_SIZE];
        for side in [0, 1 << 22, 2048] {
            let config = SegmentConfig::new(side, true);
            assert!(matches!(
                Segment::read(&record, &config),
                Err(PersistError::InvalidSideLength(_))
            ));
            assert!(matches!(
                Segment::new(IVec3::ZERO, FormatVersion::V3, &config),
                Err(PersistError::InvalidSideLength(_))
            ));
        }
        let segment = Segment::new(IVec3::ZERO, FormatVersion::V3, &small()).expect("aligned");
        assert!(matches!(
            segment.write(&SegmentConfig::new(1 << 22, true)),
            Err(PersistError::InvalidSideLength(_))
        ));
    }

    #[test]
    fn test_misaligned_origin_rejected() {
        let result = Segment::new(IVec3::new(3, 0, 0), FormatVersion::V3, &small());
        assert!(matches!(
            result,
            Err(PersistError::MisalignedSegment { side: 4, .. })
        ));
    }

    #[test]
    fn test_add_outside_rejected_and_no_replace() {
        let mut segment = Segment::new(IVec3::ZERO, FormatVersion::V3, &small()).expect("aligned");
        assert!(matches!(
            segment.add(IVec3::new(4, 0, 0), hull(), true),
            Err(PersistError::OutsideSegment { .. })
        ));
        let p = IVec3::new(1, 2, 3);
        assert_eq!(segment.add(p, hull(), true).ok(), Some(true));
        assert_eq!(
            segment.add(p, PackedBlock::from_raw(5), false).ok(),
            Some(false)
        );
        assert_eq!(segment.get(p), hull());
    }

    #[test]
    fn test_index_position_inverse() {
        for side in [4u32, 16, 32] {
            let config = SegmentConfig::new(side, true);
            let origin = IVec3::new(-(side as i32), 0, side as i32 * 3);
            let segment = Segment::new(origin, FormatVersion::V3, &config).expect("aligned");
            for index in 0..config.voxel_count() {
                assert_eq!(segment.local_index(segment.position(index)), index);
            }
        }
    }

    #[test]
    fn test_insert_into_block_list() {
        let mut segment = Segment::new(IVec3::new(-4, 0, 0), FormatVersion::V3, &small())
            .expect("aligned");
        segment.add(IVec3::new(-1, 0, 0), hull(), true).expect("inside");
        segment.add(IVec3::new(-4, 3, 2), hull(), true).expect("inside");
        let mut list = BlockList::new();
        assert_eq!(segment.insert_into(&mut list).expect("in range"), 2);
        assert!(list.contains(IVec3::new(-1, 0, 0)));
        assert!(list.contains(IVec3::new(-4, 3, 2)));
    }
}
