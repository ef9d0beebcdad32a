use hullsmith_core::constants::SEGMENT_RECORD_SIZE;
use rayon::prelude::*;

use crate::error::PersistError;
use crate::format::SegmentConfig;
use crate::segment::Segment;

/// A record that could not be decoded.
#[derive(Debug)]
pub struct RecordFailure {
    /// Zero-based record number within the region.
    pub record: usize,
    pub error: PersistError,
}

/// Decoded region data. Corrupt records are reported, not fatal.
#[derive(Debug, Default)]
pub struct RegionData {
    /// Decoded segments in record order, including invalid (empty) ones.
    pub segments: Vec<Segment>,
    pub failures: Vec<RecordFailure>,
    /// Compatibility warnings from every decoded segment.
    pub warnings: Vec<String>,
}

impl RegionData {
    /// Segments that actually hold blocks.
    pub fn valid_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|segment| segment.is_valid())
    }

    fn collect(results: Vec<(usize, Result<Segment, PersistError>)>, trailing: usize) -> Self {
        let mut data = RegionData::default();
        for (record, result) in results {
            match result {
                Ok(mut segment) => {
                    data.warnings.append(&mut segment.warnings);
                    data.segments.push(segment);
                }
                Err(error) => {
                    log::warn!("Skipping region record {}: {}", record, error);
                    data.failures.push(RecordFailure { record, error });
                }
            }
        }
        if trailing > 0 {
            let record = data.segments.len() + data.failures.len();
            let error = PersistError::TruncatedRecord {
                expected: SEGMENT_RECORD_SIZE,
                actual: trailing,
            };
            log::warn!("Skipping region record {}: {}", record, error);
            data.failures.push(RecordFailure { record, error });
        }
        for warning in &data.warnings {
            log::warn!("{}", warning);
        }
        log::debug!(
            "Loaded region: {} segments, {} failed records",
            data.segments.len(),
            data.failures.len()
        );
        data
    }
}

/// Decode every fixed-size record in `bytes`, one after another.
/// Only an unusable `config` is fatal.
pub fn load_region(bytes: &[u8], config: &SegmentConfig) -> Result<RegionData, PersistError> {
    config.validate()?;
    let chunks = bytes.chunks_exact(SEGMENT_RECORD_SIZE);
    let trailing = chunks.remainder().len();
    let results = chunks
        .enumerate()
        .map(|(record, chunk)| (record, Segment::read(chunk, config)))
        .collect();
    Ok(RegionData::collect(results, trailing))
}

/// Same as [`load_region`], decoding records on the rayon thread pool.
/// Output order matches record order.
pub fn load_region_par(
    bytes: &[u8],
    config: &SegmentConfig,
) -> Result<RegionData, PersistError> {
    config.validate()?;
    let trailing = bytes.len() % SEGMENT_RECORD_SIZE;
    let results = bytes[..bytes.len() - trailing]
        .par_chunks_exact(SEGMENT_RECORD_SIZE)
        .enumerate()
        .map(|(record, chunk)| (record, Segment::read(chunk, config)))
        .collect();
    Ok(RegionData::collect(results, trailing))
}
