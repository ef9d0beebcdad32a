use hullsmith_core::catalog::BlockCatalog;
use hullsmith_core::codec::{convert_to_rail, encode, encode_new, BlockUpdate};
use hullsmith_core::error::BlockError;
use hullsmith_core::types::{BlockId, FormatVersion, PackedBlock, Position};
use std::collections::HashMap;

use crate::block_list::BlockList;

fn write_all(
    blocks: &mut BlockList,
    updates: Vec<(Position, PackedBlock)>,
) -> Result<usize, BlockError> {
    let count = updates.len();
    for (position, block) in updates {
        blocks.set(position, block)?;
    }
    Ok(count)
}

/// Move hull blocks to `new_tier`, keeping color, shape and orientation.
/// With `only_tier` set, hull blocks of other tiers are left alone.
/// Replaced blocks get the new id's default durability and are inactive.
///
/// Nothing is written unless every hull block has a counterpart.
pub fn replace_hull(
    blocks: &mut BlockList,
    catalog: &BlockCatalog,
    version: FormatVersion,
    new_tier: u8,
    only_tier: Option<u8>,
) -> Result<usize, BlockError> {
    let mut targets: HashMap<BlockId, BlockId> = HashMap::new();
    let mut updates = Vec::new();
    for (position, block) in blocks.iter() {
        let id = block.id();
        let Some(hull) = catalog.get(id)?.hull else {
            continue;
        };
        if only_tier.is_some_and(|tier| tier != hull.tier) {
            continue;
        }
        let target = match targets.get(&id) {
            Some(&target) => target,
            None => {
                let target = catalog
                    .hull_block(new_tier, hull.color, hull.shape)
                    .ok_or_else(|| BlockError::NoHullVariant {
                        tier: new_tier,
                        color: hull.color,
                        shape: hull.shape.to_string(),
                    })?;
                targets.insert(id, target);
                target
            }
        };
        let update = BlockUpdate::id(target)
            .durability(catalog.default_hit_points(target)?)
            .active(false);
        updates.push((position, encode(block, update, version, catalog)?));
    }
    let count = write_all(blocks, updates)?;
    log::debug!("Replaced {} hull blocks with tier {}", count, new_tier);
    Ok(count)
}

/// Replace every block with id `from` by `to`. A compatible replacement keeps
/// orientation and active state; otherwise each becomes a fresh, inactive `to`.
pub fn replace_blocks(
    blocks: &mut BlockList,
    catalog: &BlockCatalog,
    version: FormatVersion,
    from: BlockId,
    to: BlockId,
    compatible: bool,
) -> Result<usize, BlockError> {
    let mut updates = Vec::new();
    for (position, block) in blocks.iter() {
        if block.id() != from {
            continue;
        }
        let replaced = if compatible {
            encode(block, BlockUpdate::id(to), version, catalog)?
        } else {
            encode_new(to, None, false, None, version, catalog)?
        };
        updates.push((position, replaced));
    }
    write_all(blocks, updates)
}

/// Swap every block that declares a rail equivalent for that rail block.
pub fn convert_rails(
    blocks: &mut BlockList,
    catalog: &BlockCatalog,
    version: FormatVersion,
) -> Result<usize, BlockError> {
    let mut updates = Vec::new();
    for (position, block) in blocks.iter() {
        if let Some(rail_id) = catalog.rail_equivalent(block.id())? {
            updates.push((position, convert_to_rail(block, rail_id, version, catalog)?));
        }
    }
    write_all(blocks, updates)
}
