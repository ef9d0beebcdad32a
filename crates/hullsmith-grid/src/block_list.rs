use glam::IVec3;
use hullsmith_core::constants::{MAX_COORD, MIN_COORD};
use hullsmith_core::error::BlockError;
use hullsmith_core::types::{BlockId, PackedBlock, Position};
use std::collections::hash_map::Drain;
use std::collections::{HashMap, HashSet};

/// Check that every coordinate of `position` fits in 16 bits.
pub fn in_coord_range(position: Position) -> bool {
    position.min_element() >= MIN_COORD && position.max_element() <= MAX_COORD
}

fn checked_position(position: Position) -> Result<Position, BlockError> {
    if in_coord_range(position) {
        Ok(position)
    } else {
        Err(BlockError::PositionOutOfRange(position))
    }
}

/// Sparse spatial index from voxel positions to packed block words.
///
/// Only non-empty words are stored; an absent key is an empty voxel.
/// Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockList {
    blocks: HashMap<Position, PackedBlock>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            blocks: HashMap::with_capacity(capacity),
        }
    }

    /// Store `block` at `position`, returning the word it replaced.
    /// Storing an empty word clears the position.
    pub fn set(
        &mut self,
        position: Position,
        block: PackedBlock,
    ) -> Result<Option<PackedBlock>, BlockError> {
        let position = checked_position(position)?;
        if block.is_empty() {
            return Ok(self.blocks.remove(&position));
        }
        Ok(self.blocks.insert(position, block))
    }

    pub fn get(&self, position: Position) -> Result<PackedBlock, BlockError> {
        self.blocks
            .get(&position)
            .copied()
            .ok_or(BlockError::NotFound(position))
    }

    pub fn remove(&mut self, position: Position) -> Result<PackedBlock, BlockError> {
        self.blocks
            .remove(&position)
            .ok_or(BlockError::NotFound(position))
    }

    pub fn contains(&self, position: Position) -> bool {
        self.blocks.contains_key(&position)
    }

    /// Remove every entry, yielding each one. The index is empty afterwards
    /// even if the iterator is dropped early.
    pub fn drain(&mut self) -> Drain<'_, Position, PackedBlock> {
        self.blocks.drain()
    }

    /// Positions of all blocks whose id is in `ids`.
    pub fn find_all(&self, ids: &HashSet<BlockId>) -> HashSet<Position> {
        self.blocks
            .iter()
            .filter(|(_, block)| ids.contains(&block.id()))
            .map(|(&position, _)| position)
            .collect()
    }

    /// Any one position holding `id`. Which one is unspecified.
    pub fn find_first(&self, id: BlockId) -> Option<Position> {
        self.blocks
            .iter()
            .find(|(_, block)| block.id() == id)
            .map(|(&position, _)| position)
    }

    /// Move every block by `offset`. Either all positions are shifted or,
    /// if any would leave the 16-bit range, nothing changes.
    pub fn translate(&mut self, offset: IVec3) -> Result<(), BlockError> {
        if offset == IVec3::ZERO {
            return Ok(());
        }
        for &position in self.blocks.keys() {
            let shifted = IVec3::new(
                position.x.wrapping_add(offset.x),
                position.y.wrapping_add(offset.y),
                position.z.wrapping_add(offset.z),
            );
            let fits = position.x.checked_add(offset.x).is_some()
                && position.y.checked_add(offset.y).is_some()
                && position.z.checked_add(offset.z).is_some()
                && in_coord_range(shifted);
            if !fits {
                return Err(BlockError::PositionOutOfRange(shifted));
            }
        }
        let moved: HashMap<Position, PackedBlock> = self
            .blocks
            .drain()
            .map(|(position, block)| (position + offset, block))
            .collect();
        self.blocks = moved;
        Ok(())
    }

    /// Remove all blocks whose id is in `ids`. Returns how many were removed.
    pub fn remove_all(&mut self, ids: &HashSet<BlockId>) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|_, block| !ids.contains(&block.id()));
        before - self.blocks.len()
    }

    /// Inclusive bounding box of all stored positions.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut positions = self.blocks.keys();
        let first = *positions.next()?;
        Some(positions.fold((first, first), |(min, max), &p| (min.min(p), max.max(p))))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, PackedBlock)> + '_ {
        self.blocks.iter().map(|(&position, &block)| (position, block))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.blocks.keys().copied()
    }

    /// Number of stored (non-empty) blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
