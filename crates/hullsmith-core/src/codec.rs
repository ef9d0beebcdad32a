use crate::catalog::{BlockCatalog, BlockDef};
use crate::constants::{DURABILITY_OFFSET, ID_BITS, ID_OFFSET};
use crate::direction::Axis;
use crate::error::BlockError;
use crate::math::field_mask;
use crate::orientation::{Orientation, Style};
use crate::types::{BlockId, FormatVersion, PackedBlock};

/// Orientation-independent fields of a packed block word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockFields {
    pub id: BlockId,
    pub durability: u16,
    /// Always false for blocks the catalog marks as non-activatable.
    pub active: bool,
}

/// Requested changes for `encode`. `None` keeps (or defaults) a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockUpdate {
    pub id: Option<BlockId>,
    pub durability: Option<u16>,
    pub active: Option<bool>,
}

impl BlockUpdate {
    pub fn id(id: BlockId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn durability(mut self, durability: u16) -> Self {
        self.durability = Some(durability);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }
}

/// Usable durability width for `def`. The 9-bit field of v0/v1 reaches
/// bit 19, which activatable and extended-axis blocks use for something else;
/// those blocks lose the top durability bit.
fn durability_width(version: FormatVersion, def: &BlockDef) -> u32 {
    let mut owned = def.style.orientation_mask(version);
    if def.can_activate {
        owned |= 1 << version.active_bit();
    }
    let mut width = version.durability_bits();
    while width > 0 && (field_mask(width) << DURABILITY_OFFSET) & owned != 0 {
        width -= 1;
    }
    width
}

fn read_durability(word: PackedBlock, version: FormatVersion, def: &BlockDef) -> u16 {
    word.bits(DURABILITY_OFFSET, durability_width(version, def)) as u16
}

/// Raw active state of `word`, ignoring whether the id can activate.
fn read_active_bit(word: PackedBlock, version: FormatVersion) -> bool {
    word.bits(version.active_bit(), 1) == 0
}

/// Decode id, durability and active flag of `word`.
pub fn decode(
    word: PackedBlock,
    version: FormatVersion,
    catalog: &BlockCatalog,
) -> Result<BlockFields, BlockError> {
    let id = word.id();
    if id.is_empty() {
        return Ok(BlockFields::default());
    }
    let def = catalog.get(id)?;
    Ok(BlockFields {
        id,
        durability: read_durability(word, version, def),
        active: def.can_activate && read_active_bit(word, version),
    })
}

/// Produce a new word from `current` with `update` applied.
///
/// - A target id of 0 yields the empty word.
/// - Missing durability falls back to the catalog default when the id
///   changes, otherwise to the current durability.
/// - Missing active keeps the current state; a block that cannot activate
///   counts as inactive.
/// - Orientation bits owned by the target style are carried over.
pub fn encode(
    current: PackedBlock,
    update: BlockUpdate,
    version: FormatVersion,
    catalog: &BlockCatalog,
) -> Result<PackedBlock, BlockError> {
    let current_id = current.id();
    let id = update.id.unwrap_or(current_id);
    if id.is_empty() {
        return Ok(PackedBlock::EMPTY);
    }
    let def = catalog.get(id)?;

    let durability = match update.durability {
        Some(durability) => durability,
        None if id != current_id => def.hit_points,
        None => read_durability(current, version, def),
    };

    let mut word = PackedBlock::EMPTY
        .with_bits(id.0 as u32, ID_OFFSET, ID_BITS)
        .with_bits(
            durability as u32,
            DURABILITY_OFFSET,
            durability_width(version, def),
        );

    if def.can_activate {
        let active = match update.active {
            Some(active) => active,
            None if current_id.is_empty() => false,
            None if !catalog.can_activate(current_id)? => false,
            None => read_active_bit(current, version),
        };
        word = word.with_bits(u32::from(!active), version.active_bit(), 1);
    }

    let carried = current.0 & def.style.orientation_mask(version);
    Ok(PackedBlock(word.0 | carried))
}

/// Encode a fresh block with explicit fields and orientation.
pub fn encode_new(
    id: BlockId,
    durability: Option<u16>,
    active: bool,
    orientation: Option<Orientation>,
    version: FormatVersion,
    catalog: &BlockCatalog,
) -> Result<PackedBlock, BlockError> {
    let update = BlockUpdate {
        id: Some(id),
        durability,
        active: Some(active),
    };
    let word = encode(PackedBlock::EMPTY, update, version, catalog)?;
    match orientation {
        Some(orientation) if !word.is_empty() => {
            catalog
                .style(id)?
                .apply_orientation(word, orientation, version)
        }
        _ => Ok(word),
    }
}

/// Style of the block stored in `word`.
pub fn style_of(word: PackedBlock, catalog: &BlockCatalog) -> Result<Style, BlockError> {
    catalog.style(word.id())
}

/// Decoded orientation of `word`, resolving its style through the catalog.
pub fn orientation_of(
    word: PackedBlock,
    version: FormatVersion,
    catalog: &BlockCatalog,
) -> Result<Orientation, BlockError> {
    style_of(word, catalog)?.orientation(word, version)
}

/// Replace the orientation of a non-empty `word`.
pub fn with_orientation(
    word: PackedBlock,
    orientation: Orientation,
    version: FormatVersion,
    catalog: &BlockCatalog,
) -> Result<PackedBlock, BlockError> {
    style_of(word, catalog)?.apply_orientation(word, orientation, version)
}

/// Mirror a whole block across the plane normal to `axis`.
pub fn mirror_block(
    word: PackedBlock,
    axis: Axis,
    version: FormatVersion,
    catalog: &BlockCatalog,
) -> Result<PackedBlock, BlockError> {
    if word.is_empty() {
        return Ok(word);
    }
    let style = style_of(word, catalog)?;
    let mirrored = style.mirror_within(style.orientation(word, version)?, axis, version)?;
    style.apply_orientation(word, mirrored, version)
}

/// Turn a whole block 90 degrees about `axis`.
pub fn turn_block(
    word: PackedBlock,
    axis: Axis,
    version: FormatVersion,
    catalog: &BlockCatalog,
) -> Result<PackedBlock, BlockError> {
    if word.is_empty() {
        return Ok(word);
    }
    let style = style_of(word, catalog)?;
    let turned = style.turn_within(style.orientation(word, version)?, axis, version)?;
    style.apply_orientation(word, turned, version)
}

/// Swap a style-0 block for the style-6 block `rail_id`, keeping its facing.
/// The result uses the rail block's default durability and is inactive.
pub fn convert_to_rail(
    word: PackedBlock,
    rail_id: BlockId,
    version: FormatVersion,
    catalog: &BlockCatalog,
) -> Result<PackedBlock, BlockError> {
    let source_style = style_of(word, catalog)?;
    let facing = match source_style.orientation(word, version)? {
        Orientation::Facing(facing) if source_style == Style::Facing => facing,
        other => {
            return Err(BlockError::InvalidOrientation {
                style: source_style.index(),
                value: other.value(),
            })
        }
    };
    let rail_style = catalog.style(rail_id)?;
    let orientation = facing.to_rail_bits().orientation();
    if rail_style != Style::Rail {
        return Err(BlockError::InvalidOrientation {
            style: rail_style.index(),
            value: orientation.value(),
        });
    }
    encode_new(
        rail_id,
        None,
        false,
        Some(orientation),
        version,
        catalog,
    )
}
