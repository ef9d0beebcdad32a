use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BlockError;
use crate::orientation::Style;
use crate::types::BlockId;

/// Geometric shape of a hull block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HullShape {
    Cube,
    Wedge,
    Corner,
    Tetra,
    Hepta,
}

impl fmt::Display for HullShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HullShape::Cube => "cube",
            HullShape::Wedge => "wedge",
            HullShape::Corner => "corner",
            HullShape::Tetra => "tetra",
            HullShape::Hepta => "hepta",
        };
        f.write_str(name)
    }
}

/// Hull classification of a block: armor tier, paint color and shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HullDetails {
    pub tier: u8,
    pub color: u8,
    pub shape: HullShape,
}

/// A single block type definition loaded from RON data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDef {
    /// Stable block ID. 0 = empty and never appears in a catalog.
    pub id: u16,
    /// Human-readable name for reports.
    pub name: String,
    /// Orientation style (0..=6).
    pub style: Style,
    /// Default durability for freshly placed blocks.
    pub hit_points: u16,
    /// Whether the packed word carries an active bit for this block.
    #[serde(default)]
    pub can_activate: bool,
    /// Hull tier/color/shape, for armor blocks only.
    #[serde(default)]
    pub hull: Option<HullDetails>,
    /// Style-6 block this block converts to when placed on rails.
    #[serde(default)]
    pub rail_equivalent: Option<u16>,
}

impl BlockDef {
    pub fn block_id(&self) -> BlockId {
        BlockId(self.id)
    }

    pub fn is_hull(&self) -> bool {
        self.hull.is_some()
    }
}

/// Read-only block type table, built once and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct BlockCatalog {
    blocks: Vec<BlockDef>,
    by_id: HashMap<u16, usize>,
    by_hull: HashMap<HullDetails, u16>,
}

impl BlockCatalog {
    /// Build the lookup tables. Later definitions win on duplicate ids;
    /// the catalog validator reports duplicates before this point.
    pub fn new(blocks: Vec<BlockDef>) -> Self {
        let mut by_id = HashMap::with_capacity(blocks.len());
        let mut by_hull = HashMap::new();
        for (index, def) in blocks.iter().enumerate() {
            by_id.insert(def.id, index);
            if let Some(hull) = def.hull {
                by_hull.insert(hull, def.id);
            }
        }
        Self {
            blocks,
            by_id,
            by_hull,
        }
    }

    /// Look up a block definition. A miss is fatal for every caller.
    pub fn get(&self, id: BlockId) -> Result<&BlockDef, BlockError> {
        self.by_id
            .get(&id.0)
            .map(|&index| &self.blocks[index])
            .ok_or(BlockError::UnknownBlockId(id.0))
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.by_id.contains_key(&id.0)
    }

    pub fn style(&self, id: BlockId) -> Result<Style, BlockError> {
        Ok(self.get(id)?.style)
    }

    pub fn can_activate(&self, id: BlockId) -> Result<bool, BlockError> {
        Ok(self.get(id)?.can_activate)
    }

    pub fn default_hit_points(&self, id: BlockId) -> Result<u16, BlockError> {
        Ok(self.get(id)?.hit_points)
    }

    /// Find the hull block with the given tier, color and shape.
    pub fn hull_block(&self, tier: u8, color: u8, shape: HullShape) -> Option<BlockId> {
        self.by_hull
            .get(&HullDetails { tier, color, shape })
            .copied()
            .map(BlockId)
    }

    /// Style-6 rail counterpart of `id`, if the catalog declares one.
    pub fn rail_equivalent(&self, id: BlockId) -> Result<Option<BlockId>, BlockError> {
        Ok(self.get(id)?.rail_equivalent.map(BlockId))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockDef> {
        self.blocks.iter()
    }

    /// Number of block definitions.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
