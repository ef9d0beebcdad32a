use glam::IVec3;
use hullsmith_core::constants::SEGMENT_RECORD_SIZE;
use hullsmith_core::math::segment_origin;
use hullsmith_core::types::FormatVersion;
use hullsmith_grid::block_list::BlockList;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::PersistError;
use crate::format::SegmentConfig;
use crate::segment::Segment;

/// Serialize segments into a region: one fixed-size record each, in order.
pub fn save_region(segments: &[Segment], config: &SegmentConfig) -> Result<Vec<u8>, PersistError> {
    let mut output = Vec::with_capacity(segments.len() * SEGMENT_RECORD_SIZE);
    for segment in segments {
        output.extend_from_slice(&segment.write(config)?);
    }
    log::debug!("Saved region: {} segments", segments.len());
    Ok(output)
}

/// Split a block index into segments, one per occupied segment origin.
/// Segments come out sorted by origin (x, then y, then z).
pub fn segments_from_index(
    blocks: &BlockList,
    version: FormatVersion,
    timestamp: u64,
    config: &SegmentConfig,
) -> Result<Vec<Segment>, PersistError> {
    let mut grouped: BTreeMap<(i32, i32, i32), Segment> = BTreeMap::new();
    for (position, block) in blocks.iter() {
        let origin = segment_origin(position, config.side_length);
        let key = (origin.x, origin.y, origin.z);
        let segment = match grouped.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut segment = Segment::new(origin, version, config)?;
                segment.timestamp = timestamp;
                entry.insert(segment)
            }
        };
        segment.add(position, block, true)?;
    }
    Ok(grouped.into_values().collect())
}

/// Rebuild a block index from decoded segments. Later segments win on overlap.
pub fn index_from_segments<'a>(
    segments: impl IntoIterator<Item = &'a Segment>,
) -> Result<BlockList, PersistError> {
    let mut blocks = BlockList::new();
    for segment in segments {
        segment.insert_into(&mut blocks)?;
    }
    Ok(blocks)
}

/// Smallest and largest segment origin, if any.
pub fn origin_bounds(segments: &[Segment]) -> Option<(IVec3, IVec3)> {
    let mut origins = segments.iter().map(|segment| segment.origin());
    let first = origins.next()?;
    Some(origins.fold((first, first), |(min, max), o| (min.min(o), max.max(o))))
}
