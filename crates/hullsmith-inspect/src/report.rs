use std::collections::BTreeMap;
use std::path::Path;

use hullsmith_core::catalog::BlockCatalog;
use hullsmith_core::types::BlockId;
use hullsmith_persist::load::RegionData;
use hullsmith_persist::save::origin_bounds;

/// Count of one block id across a region.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlockCount {
    pub id: u16,
    /// Catalog name, or `None` for ids the catalog does not know.
    pub name: Option<String>,
    pub count: usize,
}

/// A failed record, flattened for output.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FailureEntry {
    pub record: usize,
    pub error: String,
}

/// Summary of one region file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegionSummary {
    pub records: usize,
    pub valid_segments: usize,
    pub empty_segments: usize,
    pub total_blocks: usize,
    pub unknown_blocks: usize,
    pub hull_blocks: usize,
    /// Block format versions seen, with segment counts.
    pub versions: BTreeMap<u8, usize>,
    /// Inclusive origin bounds of valid segments, as `[x, y, z]`.
    pub origin_min: Option<[i32; 3]>,
    pub origin_max: Option<[i32; 3]>,
    pub blocks: Vec<BlockCount>,
    pub failures: Vec<FailureEntry>,
    pub warnings: Vec<String>,
}

/// Build a summary of decoded region data, resolving names through `catalog`.
pub fn summarize(data: &RegionData, catalog: &BlockCatalog) -> RegionSummary {
    let mut counts: BTreeMap<u16, usize> = BTreeMap::new();
    let mut versions: BTreeMap<u8, usize> = BTreeMap::new();
    for segment in data.valid_segments() {
        *versions.entry(segment.version.get()).or_default() += 1;
        for (_, block) in segment.iter() {
            *counts.entry(block.id().0).or_default() += 1;
        }
    }

    let mut unknown_blocks = 0;
    let mut hull_blocks = 0;
    let blocks: Vec<BlockCount> = counts
        .into_iter()
        .map(|(id, count)| {
            let def = catalog.get(BlockId(id)).ok();
            match def {
                Some(def) if def.is_hull() => hull_blocks += count,
                Some(_) => {}
                None => unknown_blocks += count,
            }
            BlockCount {
                id,
                name: def.map(|d| d.name.clone()),
                count,
            }
        })
        .collect();

    let valid: Vec<_> = data.valid_segments().cloned().collect();
    let bounds = origin_bounds(&valid);

    RegionSummary {
        records: data.segments.len() + data.failures.len(),
        valid_segments: valid.len(),
        empty_segments: data.segments.len() - valid.len(),
        total_blocks: blocks.iter().map(|b| b.count).sum(),
        unknown_blocks,
        hull_blocks,
        versions,
        origin_min: bounds.map(|(min, _)| min.to_array()),
        origin_max: bounds.map(|(_, max)| max.to_array()),
        blocks,
        failures: data
            .failures
            .iter()
            .map(|f| FailureEntry {
                record: f.record,
                error: f.error.to_string(),
            })
            .collect(),
        warnings: data.warnings.clone(),
    }
}

/// Save a summary to a JSON file.
pub fn save_summary(path: &Path, summary: &RegionSummary) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Format a summary as a short markdown table of block counts.
pub fn format_markdown(summary: &RegionSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} records, {} valid segments, {} blocks ({} hull, {} unknown)\n\n",
        summary.records,
        summary.valid_segments,
        summary.total_blocks,
        summary.hull_blocks,
        summary.unknown_blocks
    ));
    out.push_str("| Id | Name | Count |\n");
    out.push_str("|----|------|-------|\n");
    for b in &summary.blocks {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            b.id,
            b.name.as_deref().unwrap_or("?"),
            b.count
        ));
    }
    if !summary.failures.is_empty() {
        out.push_str(&format!(
            "\n{} record(s) could not be decoded:\n",
            summary.failures.len()
        ));
        for f in &summary.failures {
            out.push_str(&format!("  - record {}: {}\n", f.record, f.error));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use hullsmith_catalog::builtin_catalog;
    use hullsmith_core::types::{FormatVersion, PackedBlock};
    use hullsmith_persist::format::SegmentConfig;
    use hullsmith_persist::load::load_region;
    use hullsmith_persist::save::save_region;
    use hullsmith_persist::segment::Segment;

    fn region() -> RegionData {
        let config = SegmentConfig::new(4, true);
        let mut a = Segment::new(IVec3::ZERO, FormatVersion::V3, &config).expect("aligned");
        a.add(IVec3::ZERO, PackedBlock::from_raw(598), true).expect("inside");
        a.add(IVec3::ONE, PackedBlock::from_raw(598), true).expect("inside");
        a.add(IVec3::X, PackedBlock::from_raw(1), true).expect("inside");
        let mut b = Segment::new(IVec3::new(8, 0, -4), FormatVersion::V2, &config).expect("aligned");
        b.add(IVec3::new(8, 0, -4), PackedBlock::from_raw(2000), true)
            .expect("inside");
        let empty = Segment::new(IVec3::new(-4, 0, 0), FormatVersion::V3, &config).expect("aligned");
        let mut bytes = save_region(&[a, b, empty], &config).expect("should save");
        bytes.extend_from_slice(&[1, 2, 3]);
        load_region(&bytes, &config).expect("valid config")
    }

    #[test]
    fn test_summarize_counts() {
        let catalog = builtin_catalog().expect("should load");
        let summary = summarize(&region(), &catalog);
        assert_eq!(summary.records, 4);
        assert_eq!(summary.valid_segments, 2);
        assert_eq!(summary.empty_segments, 1);
        assert_eq!(summary.total_blocks, 4);
        assert_eq!(summary.hull_blocks, 2);
        assert_eq!(summary.unknown_blocks, 1);
        assert_eq!(summary.versions.get(&2), Some(&1));
        assert_eq!(summary.versions.get(&3), Some(&1));
        assert_eq!(summary.origin_min, Some([0, 0, -4]));
        assert_eq!(summary.origin_max, Some([8, 0, 0]));
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.warnings.len(), 1);

        let ids: Vec<u16> = summary.blocks.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 598, 2000]);
        assert_eq!(summary.blocks[0].name.as_deref(), Some("Ship Core"));
        assert_eq!(summary.blocks[2].name, None);
    }

    #[test]
    fn test_summary_json_roundtrip() {
        let catalog = builtin_catalog().expect("should load");
        let summary = summarize(&region(), &catalog);
        let json = serde_json::to_string(&summary).expect("should serialize");
        let back: RegionSummary = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back, summary);
    }

    #[test]
    fn test_format_markdown_lists_blocks() {
        let catalog = builtin_catalog().expect("should load");
        let text = format_markdown(&summarize(&region(), &catalog));
        assert!(text.contains("| 598 | Grey Hull | 2 |"));
        assert!(text.contains("| 2000 | ? | 1 |"));
        assert!(text.contains("record 3"));
    }
}
