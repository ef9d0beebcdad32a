use hullsmith_core::catalog::{BlockDef, HullDetails, HullShape};
use hullsmith_core::constants::MAX_BLOCK_ID;
use hullsmith_core::orientation::Style;
use hullsmith_core::types::FormatVersion;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate block ID {0}")]
    DuplicateBlockId(u16),
    #[error("Block '{name}' has ID {id} outside 1..={max}")]
    BlockIdOutOfRange { name: String, id: u16, max: u16 },
    #[error("Block '{name}' hit_points {value} exceed the narrowest durability field ({max})")]
    HitPointsExceedMax { name: String, value: u16, max: u16 },
    #[error("Blocks {first} and {second} share hull tier {tier}, color {color}, shape {shape}")]
    DuplicateHullVariant {
        first: u16,
        second: u16,
        tier: u8,
        color: u8,
        shape: HullShape,
    },
    #[error("Hull block '{name}' has shape {shape} but style {style:?}")]
    HullStyleMismatch {
        name: String,
        shape: HullShape,
        style: Style,
    },
    #[error("Block '{name}' is activatable but its style {style:?} owns the legacy active bit")]
    ActiveBitConflict { name: String, style: Style },
    #[error("Block '{name}' has a rail equivalent but is not style 0")]
    RailSourceNotFacing { name: String },
    #[error("Block '{name}' references unknown rail block ID {id}")]
    UnknownRailRef { name: String, id: u16 },
    #[error("Block '{name}' references rail block ID {id} which is not style 6")]
    RailTargetNotRail { name: String, id: u16 },
}

fn expected_styles(shape: HullShape) -> &'static [Style] {
    match shape {
        HullShape::Cube => &[Style::Facing, Style::Plain],
        HullShape::Wedge => &[Style::Wedge],
        HullShape::Corner => &[Style::Corner],
        HullShape::Tetra => &[Style::Tetra],
        HullShape::Hepta => &[Style::Hepta],
    }
}

/// Validate block definitions before they are indexed into a catalog.
pub fn validate_blocks(blocks: &[BlockDef]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen_ids = HashSet::new();
    for def in blocks {
        if !seen_ids.insert(def.id) {
            errors.push(ValidationError::DuplicateBlockId(def.id));
        }
    }

    // Every version must be able to store the default durability
    let max_hit_points = FormatVersion::ALL
        .iter()
        .map(|v| v.max_durability())
        .min()
        .unwrap_or(0);
    let legacy = FormatVersion::V0;
    let legacy_active = 1 << legacy.active_bit();
    let mut hull_owner: HashMap<HullDetails, u16> = HashMap::new();

    for def in blocks {
        if def.id == 0 || def.id > MAX_BLOCK_ID {
            errors.push(ValidationError::BlockIdOutOfRange {
                name: def.name.clone(),
                id: def.id,
                max: MAX_BLOCK_ID,
            });
        }
        if def.hit_points > max_hit_points {
            errors.push(ValidationError::HitPointsExceedMax {
                name: def.name.clone(),
                value: def.hit_points,
                max: max_hit_points,
            });
        }
        if def.can_activate && def.style.orientation_mask(legacy) & legacy_active != 0 {
            errors.push(ValidationError::ActiveBitConflict {
                name: def.name.clone(),
                style: def.style,
            });
        }

        if let Some(hull) = def.hull {
            if !expected_styles(hull.shape).contains(&def.style) {
                errors.push(ValidationError::HullStyleMismatch {
                    name: def.name.clone(),
                    shape: hull.shape,
                    style: def.style,
                });
            }
            if let Some(&first) = hull_owner.get(&hull) {
                errors.push(ValidationError::DuplicateHullVariant {
                    first,
                    second: def.id,
                    tier: hull.tier,
                    color: hull.color,
                    shape: hull.shape,
                });
            } else {
                hull_owner.insert(hull, def.id);
            }
        }
    }

    let styles: HashMap<u16, Style> = blocks.iter().map(|d| (d.id, d.style)).collect();
    for def in blocks {
        let Some(rail_id) = def.rail_equivalent else {
            continue;
        };
        if def.style != Style::Facing {
            errors.push(ValidationError::RailSourceNotFacing {
                name: def.name.clone(),
            });
        }
        match styles.get(&rail_id) {
            None => errors.push(ValidationError::UnknownRailRef {
                name: def.name.clone(),
                id: rail_id,
            }),
            Some(Style::Rail) => {}
            Some(_) => errors.push(ValidationError::RailTargetNotRail {
                name: def.name.clone(),
                id: rail_id,
            }),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
