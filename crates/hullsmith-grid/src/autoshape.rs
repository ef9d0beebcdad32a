//! Seam for hull auto-shaping. The decision of which wedge, corner, tetra or
//! hepta replaces a border block lives in a `ShapeClassifier`; this module
//! only feeds it flood results and writes its answers back.

use hullsmith_core::error::BlockError;
use hullsmith_core::types::{PackedBlock, Position};

use crate::block_list::BlockList;
use crate::periphery::Annotation;

/// Chooses a replacement word for an occupied border position.
pub trait ShapeClassifier {
    /// Return `None` to leave the block unchanged.
    fn classify(
        &self,
        annotation: &Annotation,
        position: Position,
        current: PackedBlock,
    ) -> Option<PackedBlock>;
}

impl<F> ShapeClassifier for F
where
    F: Fn(&Annotation, Position, PackedBlock) -> Option<PackedBlock>,
{
    fn classify(
        &self,
        annotation: &Annotation,
        position: Position,
        current: PackedBlock,
    ) -> Option<PackedBlock> {
        self(annotation, position, current)
    }
}

/// Ask `classifier` about every border position still present in `blocks`
/// and store its replacements. Returns the number of blocks changed.
pub fn apply_shapes<C: ShapeClassifier + ?Sized>(
    blocks: &mut BlockList,
    annotation: &Annotation,
    classifier: &C,
) -> Result<usize, BlockError> {
    let mut replacements = Vec::new();
    for &position in &annotation.border {
        let Ok(current) = blocks.get(position) else {
            continue;
        };
        if let Some(shaped) = classifier.classify(annotation, position, current) {
            if shaped != current {
                replacements.push((position, shaped));
            }
        }
    }
    for &(position, shaped) in &replacements {
        blocks.set(position, shaped)?;
    }
    log::debug!(
        "Auto-shape replaced {} of {} border blocks",
        replacements.len(),
        annotation.border.len()
    );
    Ok(replacements.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::periphery::PeripheryAnalyzer;
    use glam::IVec3;

    #[test]
    fn test_apply_shapes_rewrites_border_only() {
        let mut blocks = BlockList::new();
        let wall = IVec3::new(1, 0, 0);
        let far = IVec3::new(9, 9, 9);
        blocks.set(wall, PackedBlock::from_raw(598)).expect("in range");
        blocks.set(far, PackedBlock::from_raw(598)).expect("in range");

        let annotation = PeripheryAnalyzer::new(&blocks)
            .flood(IVec3::ZERO, IVec3::ZERO, IVec3::ZERO)
            .expect("seed is empty");
        assert!(annotation.border.contains(&wall));

        let to_wedge =
            |_: &Annotation, _: Position, _: PackedBlock| Some(PackedBlock::from_raw(599));
        let changed = apply_shapes(&mut blocks, &annotation, &to_wedge).expect("in range");
        assert_eq!(changed, 1);
        assert_eq!(blocks.get(wall), Ok(PackedBlock::from_raw(599)));
        assert_eq!(blocks.get(far), Ok(PackedBlock::from_raw(598)));
    }

    #[test]
    fn test_apply_shapes_can_decline() {
        let mut blocks = BlockList::new();
        blocks
            .set(IVec3::new(1, 0, 0), PackedBlock::from_raw(598))
            .expect("in range");
        let annotation = PeripheryAnalyzer::new(&blocks)
            .flood(IVec3::ZERO, IVec3::ZERO, IVec3::ZERO)
            .expect("seed is empty");
        let keep = |_: &Annotation, _: Position, _: PackedBlock| None::<PackedBlock>;
        assert_eq!(apply_shapes(&mut blocks, &annotation, &keep), Ok(0));
    }
}
