//! Flood-fill classification of empty space around a hull.
//!
//! A flood expands through face-adjacent empty voxels. Occupied voxels it
//! runs into, plus occupied voxels sharing only an edge with a flooded one,
//! form the `border`. Corner-only contact is ignored, so a hull that touches
//! itself at corners is not considered watertight.

use glam::IVec3;
use hullsmith_core::direction::{neighbors, NeighborKind, FACE_OFFSETS};
use hullsmith_core::error::BlockError;
use hullsmith_core::types::Position;
use std::collections::{HashSet, VecDeque};

use crate::block_list::BlockList;

/// Occupancy weight of a position, supplied by the shape classifier.
/// Zero means the position lies outside the region to trace.
pub trait PeripheryWeight {
    fn weight(&self, position: Position) -> u32;
}

impl<F> PeripheryWeight for F
where
    F: Fn(Position) -> u32,
{
    fn weight(&self, position: Position) -> u32 {
        self(position)
    }
}

/// Result of one flood run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Empty positions reached by the flood.
    pub marked: HashSet<Position>,
    /// Occupied positions touching the flooded region.
    pub border: HashSet<Position>,
}

impl Annotation {
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty() && self.border.is_empty()
    }

    /// Drop marked positions the oracle gives zero weight.
    pub fn prune_marked<W: PeripheryWeight + ?Sized>(&mut self, oracle: &W) {
        self.marked.retain(|&position| oracle.weight(position) > 0);
    }

    fn near_border(&self, position: Position) -> bool {
        neighbors(position).any(|(_, n)| self.border.contains(&n))
    }

    /// Whether the marked region reaches open space, judged by a ray cast
    /// from `reference` along +x up to `max_bound.x + 1`.
    ///
    /// The ray answers open if it starts on the border, crosses a marked
    /// position or never hits the border. When it hits the border first the
    /// answer comes from `trace_border` at the last position before the hit,
    /// where `false` means undetermined.
    pub fn is_open(
        &self,
        _min_bound: Position,
        max_bound: Position,
        reference: Position,
    ) -> Result<bool, BlockError> {
        if self.border.is_empty() {
            return Err(BlockError::EmptyBorder);
        }
        if self.border.contains(&reference) {
            return Ok(true);
        }
        let mut previous = reference;
        for x in reference.x..max_bound.x + 1 {
            let position = IVec3::new(x, reference.y, reference.z);
            if self.marked.contains(&position) {
                return Ok(true);
            }
            if self.border.contains(&position) {
                return self.trace_border(previous);
            }
            previous = position;
        }
        Ok(true)
    }

    /// Walk the empty shell hugging the border, starting at `start`, looking
    /// for a marked position. Only positions within one step of the border
    /// are walked. Returns `false` when no marked position is reachable.
    pub fn trace_border(&self, start: Position) -> Result<bool, BlockError> {
        if self.border.contains(&start) {
            return Err(BlockError::InvalidSeed(start));
        }
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(position) = queue.pop_front() {
            if self.border.contains(&position) || visited.contains(&position) {
                continue;
            }
            if self.marked.contains(&position) {
                return Ok(true);
            }
            if !self.near_border(position) {
                continue;
            }
            visited.insert(position);
            for offset in FACE_OFFSETS {
                let next = position + offset;
                if self.marked.contains(&next) {
                    return Ok(true);
                }
                if !self.border.contains(&next) {
                    queue.push_back(next);
                }
            }
        }
        Ok(false)
    }
}

fn in_flood_bounds(position: Position, min_bound: Position, max_bound: Position) -> bool {
    position.cmpge(min_bound - IVec3::ONE).all() && position.cmple(max_bound + IVec3::ONE).all()
}

/// Flood-fill analyzer over a borrowed spatial index. Holds no state
/// between calls; each operation returns a fresh `Annotation`.
pub struct PeripheryAnalyzer<'a> {
    blocks: &'a BlockList,
}

impl<'a> PeripheryAnalyzer<'a> {
    pub fn new(blocks: &'a BlockList) -> Self {
        Self { blocks }
    }

    /// Queue the face neighbors of a flooded position and record
    /// edge-adjacent occupied positions as border.
    fn expand(
        &self,
        annotation: &mut Annotation,
        queue: &mut VecDeque<Position>,
        position: Position,
    ) {
        for (kind, next) in neighbors(position) {
            match kind {
                NeighborKind::Corner => {}
                NeighborKind::Edge => {
                    if self.blocks.contains(next) {
                        annotation.border.insert(next);
                    }
                }
                NeighborKind::Face => {
                    if !annotation.marked.contains(&next) && !annotation.border.contains(&next) {
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    /// Flood the empty space connected to `seed` inside the box
    /// `[min_bound - 1, max_bound + 1]`.
    pub fn flood(
        &self,
        seed: Position,
        min_bound: Position,
        max_bound: Position,
    ) -> Result<Annotation, BlockError> {
        if self.blocks.contains(seed) {
            return Err(BlockError::InvalidSeed(seed));
        }
        let mut annotation = Annotation::default();
        let mut queue = VecDeque::from([seed]);
        while let Some(position) = queue.pop_front() {
            if !in_flood_bounds(position, min_bound, max_bound) {
                continue;
            }
            if self.blocks.contains(position) {
                annotation.border.insert(position);
                continue;
            }
            if !annotation.marked.insert(position) {
                continue;
            }
            self.expand(&mut annotation, &mut queue, position);
        }
        log::debug!(
            "Flood from {}: {} marked, {} border",
            seed,
            annotation.marked.len(),
            annotation.border.len()
        );
        Ok(annotation)
    }

    fn trace_into<W: PeripheryWeight + ?Sized>(
        &self,
        annotation: &mut Annotation,
        seed: Position,
        oracle: &W,
    ) {
        let mut queue = VecDeque::from([seed]);
        while let Some(position) = queue.pop_front() {
            if self.blocks.contains(position) {
                annotation.border.insert(position);
                continue;
            }
            if oracle.weight(position) == 0 {
                continue;
            }
            if !annotation.marked.insert(position) {
                continue;
            }
            self.expand(annotation, &mut queue, position);
        }
    }

    /// Flood from `seed` through positions the oracle weighs above zero.
    /// The oracle must be zero outside a finite region.
    pub fn trace_boundary<W: PeripheryWeight + ?Sized>(
        &self,
        seed: Position,
        oracle: &W,
    ) -> Result<Annotation, BlockError> {
        if oracle.weight(seed) == 0 {
            return Err(BlockError::InvalidSeed(seed));
        }
        let mut annotation = Annotation::default();
        self.trace_into(&mut annotation, seed, oracle);
        Ok(annotation)
    }

    /// Scan `[min_bound - 1, max_bound + 1)` with x outermost and z innermost
    /// and trace from the first position with non-zero weight. Returns an
    /// empty annotation when no such position exists.
    pub fn classify_first_boundary<W: PeripheryWeight + ?Sized>(
        &self,
        min_bound: Position,
        max_bound: Position,
        oracle: &W,
    ) -> Annotation {
        let lo = min_bound - IVec3::ONE;
        let hi = max_bound + IVec3::ONE;
        let mut annotation = Annotation::default();
        for x in lo.x..hi.x {
            for y in lo.y..hi.y {
                for z in lo.z..hi.z {
                    let position = IVec3::new(x, y, z);
                    if oracle.weight(position) == 0 {
                        continue;
                    }
                    self.trace_into(&mut annotation, position, oracle);
                    return annotation;
                }
            }
        }
        annotation
    }
}
