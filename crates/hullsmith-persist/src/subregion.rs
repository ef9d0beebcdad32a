use hullsmith_core::types::SegmentOrigin;

use crate::error::PersistError;
use crate::format::SegmentConfig;
use crate::save;
use crate::segment::Segment;

/// Export the segments whose origin lies in `[bbox_min, bbox_max]` inclusive.
///
/// Filters by origin only, then delegates to save.
pub fn export_subregion(
    segments: &[Segment],
    bbox_min: SegmentOrigin,
    bbox_max: SegmentOrigin,
    config: &SegmentConfig,
) -> Result<Vec<u8>, PersistError> {
    let filtered: Vec<Segment> = segments
        .iter()
        .filter(|s| {
            let o = s.origin();
            o.cmpge(bbox_min).all() && o.cmple(bbox_max).all()
        })
        .cloned()
        .collect();

    save::save_region(&filtered, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load_region;
    use glam::IVec3;
    use hullsmith_core::types::{FormatVersion, PackedBlock};

    fn segment(origin: IVec3) -> Segment {
        let config = SegmentConfig::new(4, true);
        let mut segment = Segment::new(origin, FormatVersion::V3, &config).expect("aligned");
        segment
            .add(origin, PackedBlock::from_raw(598), true)
            .expect("inside");
        segment
    }

    #[test]
    fn test_subregion_filters_correctly() {
        let config = SegmentConfig::new(4, true);
        let segments = vec![
            segment(IVec3::new(0, 0, 0)),
            segment(IVec3::new(4, 0, 0)),
            segment(IVec3::new(20, 20, 20)),
        ];

        let saved =
            export_subregion(&segments, IVec3::ZERO, IVec3::new(8, 8, 8), &config).expect("fits");

        let loaded = load_region(&saved, &config).expect("valid config");
        // Only (0,0,0) and (4,0,0) are in the box; (20,20,20) is excluded
        assert_eq!(loaded.segments.len(), 2);

        let origins: Vec<_> = loaded.segments.iter().map(|s| s.origin()).collect();
        assert!(origins.contains(&IVec3::new(0, 0, 0)));
        assert!(origins.contains(&IVec3::new(4, 0, 0)));
        assert!(!origins.contains(&IVec3::new(20, 20, 20)));
    }

    #[test]
    fn test_subregion_bounds_are_inclusive() {
        let config = SegmentConfig::new(4, true);
        let segments = vec![segment(IVec3::new(-4, 8, 0))];
        let saved = export_subregion(
            &segments,
            IVec3::new(-4, 8, 0),
            IVec3::new(-4, 8, 0),
            &config,
        )
        .expect("fits");
        assert_eq!(load_region(&saved, &config).expect("valid config").segments.len(), 1);
    }

    #[test]
    fn test_empty_selection_is_empty_region() {
        let config = SegmentConfig::new(4, true);
        let segments = vec![segment(IVec3::ZERO)];
        let saved = export_subregion(&segments, IVec3::ONE, IVec3::splat(8), &config)
            .expect("fits");
        assert!(saved.is_empty());
    }
}
