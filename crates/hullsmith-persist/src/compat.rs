use hullsmith_core::constants::LATEST_FORMAT_VERSION;

use crate::error::{CorruptReason, PersistError};
use crate::format::{SegmentConfig, SegmentHeader};

/// Validate a segment header and return any compatibility warnings.
///
/// Returns Ok(warnings) on success, Err on fatal errors.
/// A legacy block format version produces a warning, not an error.
pub fn validate_header(
    header: &SegmentHeader,
    config: &SegmentConfig,
) -> Result<Vec<String>, PersistError> {
    if header.version > LATEST_FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(header.version));
    }

    let capacity = config.data_capacity();
    let size = header.compressed_size as usize;
    if header.valid && size > capacity {
        return Err(PersistError::CorruptSegment {
            origin: header.origin,
            reason: CorruptReason::Oversized { size, capacity },
        });
    }

    let mut warnings = Vec::new();

    if header.version < LATEST_FORMAT_VERSION {
        warnings.push(format!(
            "Segment {} uses legacy block format v{} (current: v{}). \
             Saving keeps the legacy layout.",
            header.origin, header.version, LATEST_FORMAT_VERSION
        ));
    }

    if !header.valid && header.compressed_size != 0 {
        warnings.push(format!(
            "Segment {} is flagged empty but records {} payload bytes; ignoring them.",
            header.origin, header.compressed_size
        ));
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    fn test_header(version: u8) -> SegmentHeader {
        SegmentHeader {
            version,
            timestamp: 0,
            origin: IVec3::new(32, 0, 0),
            valid: true,
            compressed_size: 100,
        }
    }

    #[test]
    fn test_current_header_no_warnings() {
        let warnings =
            validate_header(&test_header(3), &SegmentConfig::default()).expect("should succeed");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_legacy_version_warns() {
        let warnings = validate_header(&test_header(1), &SegmentConfig::default())
            .expect("should succeed with warnings");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("legacy block format v1"));
        assert!(warnings[0].contains("keeps the legacy layout"));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let result = validate_header(&test_header(9), &SegmentConfig::default());
        assert!(matches!(result, Err(PersistError::UnsupportedVersion(9))));
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let mut header = test_header(3);
        header.compressed_size = 5095;
        let result = validate_header(&header, &SegmentConfig::default());
        assert!(matches!(
            result,
            Err(PersistError::CorruptSegment {
                reason: CorruptReason::Oversized {
                    size: 5095,
                    capacity: 5094
                },
                ..
            })
        ));
        // One byte more room without the version byte
        header.compressed_size = 5095;
        assert!(validate_header(&header, &SegmentConfig::new(32, false)).is_ok());
    }

    #[test]
    fn test_stale_size_on_empty_segment_warns() {
        let mut header = test_header(3);
        header.valid = false;
        header.compressed_size = 99_999;
        let warnings =
            validate_header(&header, &SegmentConfig::default()).expect("should succeed");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("flagged empty"));
    }
}
