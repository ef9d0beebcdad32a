//! Orientation styles: how the high bits of a packed block word encode
//! facing or rotation for each shape family, plus the turn/mirror algebra.
//!
//! Bit layout of the orientation field:
//!
//! | Style        | before v3                          | v3                     |
//! |--------------|------------------------------------|------------------------|
//! | 0 (facing)   | facing [20:23)                     | facing [19:22)         |
//! | 1, 3, 4, 5   | rotations [20:22), axis [22:24)    | rotations [19:21), axis [21:24) |
//! | 2, 6         | as above, plus axis bit 2 at 19    | rotations [19:21), axis [21:24) |

use serde::{Deserialize, Serialize};

use crate::constants::{FACE_COUNT, STYLE_COUNT};
use crate::direction::Axis;
use crate::error::BlockError;
use crate::types::{FormatVersion, PackedBlock};

/// Shape family of a block, resolved from its id through the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Style {
    /// Axis-aligned facing only, paired with the active bit.
    Facing = 0,
    Wedge = 1,
    Corner = 2,
    Plain = 3,
    Tetra = 4,
    Hepta = 5,
    /// Rail-mounted equivalent of a style-0 block.
    Rail = 6,
}

impl Style {
    pub const ALL: [Style; STYLE_COUNT] = [
        Style::Facing,
        Style::Wedge,
        Style::Corner,
        Style::Plain,
        Style::Tetra,
        Style::Hepta,
        Style::Rail,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Style {
    type Error = BlockError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Style::ALL
            .get(value as usize)
            .copied()
            .ok_or(BlockError::InvalidStyle(value))
    }
}

impl From<Style> for u8 {
    fn from(style: Style) -> Self {
        style as u8
    }
}

/// One of the six block faces used by style 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Facing {
    Front = 0,
    Back = 1,
    Top = 2,
    Bottom = 3,
    Right = 4,
    Left = 5,
}

impl Facing {
    pub const ALL: [Facing; FACE_COUNT] = [
        Facing::Front,
        Facing::Back,
        Facing::Top,
        Facing::Bottom,
        Facing::Right,
        Facing::Left,
    ];

    pub fn from_index(index: u8) -> Option<Facing> {
        Facing::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Style-6 bits representing this facing, used when a style-0 block is
    /// swapped for its rail equivalent.
    pub fn to_rail_bits(self) -> RailBits {
        let (axis, rotations) = RAIL_FROM_FACING[self as usize];
        RailBits {
            high_axis_bit: axis >> 2,
            axis_bits: axis & 0b11,
            rotations,
        }
    }
}

/// Axis of rotation plus a number of quarter turns around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisRotation {
    pub axis: u8,
    pub rotations: u8,
}

/// Decoded orientation value; which variant applies depends on the style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Facing(Facing),
    Axis(AxisRotation),
}

impl Orientation {
    pub fn axis(axis: u8, rotations: u8) -> Self {
        Orientation::Axis(AxisRotation { axis, rotations })
    }

    /// Flat numeric form, used in error reports.
    pub fn value(self) -> u32 {
        match self {
            Orientation::Facing(facing) => facing as u32,
            Orientation::Axis(a) => ((a.axis as u32) << 2) | a.rotations as u32,
        }
    }
}

/// Style-6 orientation split the way the legacy bit layout stores it:
/// axis bit 2 (bit 19), axis bits 0..2 (bits 22, 23) and the rotation count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RailBits {
    pub high_axis_bit: u8,
    pub axis_bits: u8,
    pub rotations: u8,
}

impl RailBits {
    pub fn orientation(self) -> Orientation {
        Orientation::axis((self.high_axis_bit << 2) | self.axis_bits, self.rotations)
    }
}

/// (axis, rotations) for each facing, indexed by facing id.
const RAIL_FROM_FACING: [(u8, u8); FACE_COUNT] = [
    (0, 2), // FRONT: up
    (1, 0), // BACK
    (3, 2), // TOP: forward
    (2, 2), // BOTTOM: forward
    (4, 0), // RIGHT: forward
    (5, 0), // LEFT: forward
];

/// How a style lays out its orientation bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Facing,
    /// `extended` styles keep a third axis bit at bit 19 before v3.
    AxisRotation { extended: bool },
}

/// Per-style dispatch entry: bit layout plus 90 degree turn permutations.
struct StyleOps {
    layout: Layout,
    turn_x: [u8; FACE_COUNT],
    turn_y: [u8; FACE_COUNT],
    turn_z: [u8; FACE_COUNT],
}

const TURN_X_90: [u8; FACE_COUNT] = [3, 2, 0, 1, 4, 5];
const TURN_Y_90: [u8; FACE_COUNT] = [4, 5, 2, 3, 1, 0];
const TURN_Z_90: [u8; FACE_COUNT] = [0, 1, 4, 5, 3, 2];

const fn ops(layout: Layout) -> StyleOps {
    StyleOps {
        layout,
        turn_x: TURN_X_90,
        turn_y: TURN_Y_90,
        turn_z: TURN_Z_90,
    }
}

static STYLE_OPS: [StyleOps; STYLE_COUNT] = [
    ops(Layout::Facing),
    ops(Layout::AxisRotation { extended: false }),
    ops(Layout::AxisRotation { extended: true }),
    ops(Layout::AxisRotation { extended: false }),
    ops(Layout::AxisRotation { extended: false }),
    ops(Layout::AxisRotation { extended: false }),
    ops(Layout::AxisRotation { extended: true }),
];

const FACING_BITS: u32 = 3;
const ROTATION_BITS: u32 = 2;
const LEGACY_AXIS_BITS: u32 = 2;
const AXIS_BITS: u32 = 3;
const LEGACY_HIGH_AXIS_BIT: u32 = 19;

/// Axis of the half turn that stands in for a mirror across `axis`.
fn mirror_turn_axis(axis: Axis) -> Axis {
    match axis {
        Axis::X => Axis::Y,
        Axis::Y => Axis::Z,
        Axis::Z => Axis::X,
    }
}

impl Style {
    fn ops(self) -> &'static StyleOps {
        &STYLE_OPS[self as usize]
    }

    fn invalid(self, orientation: Orientation) -> BlockError {
        BlockError::InvalidOrientation {
            style: self.index(),
            value: orientation.value(),
        }
    }

    /// Bits of a packed word that belong to this style's orientation field.
    pub fn orientation_mask(self, version: FormatVersion) -> u32 {
        match (self.ops().layout, version.is_legacy()) {
            (Layout::Facing, true) => 0b111 << 20,
            (Layout::Facing, false) => 0b111 << 19,
            (Layout::AxisRotation { extended }, true) => {
                let high = if extended { 1 << LEGACY_HIGH_AXIS_BIT } else { 0 };
                (0b1111 << 20) | high
            }
            (Layout::AxisRotation { .. }, false) => 0b11111 << 19,
        }
    }

    /// Largest axis value this style can store in `version`.
    fn max_axis(self, version: FormatVersion) -> u8 {
        match self.ops().layout {
            Layout::AxisRotation { extended: false } if version.is_legacy() => 3,
            _ => 7,
        }
    }

    /// Decode the orientation of `word`. The caller must have resolved the
    /// style from the word's id; decoding with another style yields garbage.
    pub fn orientation(
        self,
        word: PackedBlock,
        version: FormatVersion,
    ) -> Result<Orientation, BlockError> {
        match self.ops().layout {
            Layout::Facing => {
                let offset = if version.is_legacy() { 20 } else { 19 };
                let value = word.bits(offset, FACING_BITS);
                Facing::from_index(value as u8)
                    .map(Orientation::Facing)
                    .ok_or(BlockError::InvalidOrientation {
                        style: self.index(),
                        value,
                    })
            }
            Layout::AxisRotation { extended } => {
                let (axis, rotations) = if version.is_legacy() {
                    let mut axis = word.bits(22, LEGACY_AXIS_BITS);
                    if extended {
                        axis |= word.bits(LEGACY_HIGH_AXIS_BIT, 1) << 2;
                    }
                    (axis, word.bits(20, ROTATION_BITS))
                } else {
                    (word.bits(21, AXIS_BITS), word.bits(19, ROTATION_BITS))
                };
                Ok(Orientation::axis(axis as u8, rotations as u8))
            }
        }
    }

    /// Write `orientation` into `word`, clearing exactly the bits this style
    /// owns first. Id, durability and active bits are left untouched.
    pub fn apply_orientation(
        self,
        word: PackedBlock,
        orientation: Orientation,
        version: FormatVersion,
    ) -> Result<PackedBlock, BlockError> {
        let cleared = PackedBlock(word.0 & !self.orientation_mask(version));
        match (self.ops().layout, orientation) {
            (Layout::Facing, Orientation::Facing(facing)) => {
                let offset = if version.is_legacy() { 20 } else { 19 };
                Ok(cleared.with_bits(facing as u32, offset, FACING_BITS))
            }
            (Layout::AxisRotation { extended }, Orientation::Axis(a)) => {
                if a.axis > self.max_axis(version) || a.rotations > 3 {
                    return Err(self.invalid(orientation));
                }
                let rotations = a.rotations as u32;
                let axis = a.axis as u32;
                if version.is_legacy() {
                    let mut out = cleared
                        .with_bits(rotations, 20, ROTATION_BITS)
                        .with_bits(axis & 0b11, 22, LEGACY_AXIS_BITS);
                    if extended {
                        out = out.with_bits(axis >> 2, LEGACY_HIGH_AXIS_BIT, 1);
                    }
                    Ok(out)
                } else {
                    Ok(cleared
                        .with_bits(rotations, 19, ROTATION_BITS)
                        .with_bits(axis, 21, AXIS_BITS))
                }
            }
            _ => Err(self.invalid(orientation)),
        }
    }

    /// Rotate by 90 degrees about `axis` using this style's permutation table.
    /// Axis-rotation styles permute the axis value and keep the rotation count.
    pub fn turn(self, orientation: Orientation, axis: Axis) -> Result<Orientation, BlockError> {
        let ops = self.ops();
        let table = match axis {
            Axis::X => &ops.turn_x,
            Axis::Y => &ops.turn_y,
            Axis::Z => &ops.turn_z,
        };
        match (ops.layout, orientation) {
            (Layout::Facing, Orientation::Facing(facing)) => {
                Facing::from_index(table[facing as usize])
                    .map(Orientation::Facing)
                    .ok_or_else(|| self.invalid(orientation))
            }
            (Layout::AxisRotation { .. }, Orientation::Axis(a)) => {
                let turned = table
                    .get(a.axis as usize)
                    .ok_or_else(|| self.invalid(orientation))?;
                Ok(Orientation::axis(*turned, a.rotations))
            }
            _ => Err(self.invalid(orientation)),
        }
    }

    pub fn turn_x_90(self, orientation: Orientation) -> Result<Orientation, BlockError> {
        self.turn(orientation, Axis::X)
    }

    pub fn turn_y_90(self, orientation: Orientation) -> Result<Orientation, BlockError> {
        self.turn(orientation, Axis::Y)
    }

    pub fn turn_z_90(self, orientation: Orientation) -> Result<Orientation, BlockError> {
        self.turn(orientation, Axis::Z)
    }

    /// Mirror across the plane normal to `axis`, expressed as a half turn
    /// about another axis: X mirrors via Y, Y via Z, Z via X. For shapes
    /// without the matching symmetry this is an approximation.
    pub fn mirror(self, orientation: Orientation, axis: Axis) -> Result<Orientation, BlockError> {
        let about = mirror_turn_axis(axis);
        let once = self.turn(orientation, about)?;
        self.turn(once, about)
    }

    /// Turn within the axis values `version` can store. Legacy non-extended
    /// styles only hold axes 0..=3, so the canonical cycle steps over 4 and 5:
    /// e.g. a Y turn swaps axes 0 and 1. Four turns are still the identity.
    pub fn turn_within(
        self,
        orientation: Orientation,
        axis: Axis,
        version: FormatVersion,
    ) -> Result<Orientation, BlockError> {
        let max_axis = self.max_axis(version);
        let mut turned = self.turn(orientation, axis)?;
        for _ in 0..FACE_COUNT {
            match turned {
                Orientation::Axis(a) if a.axis > max_axis => {
                    turned = self.turn(turned, axis)?;
                }
                _ => return Ok(turned),
            }
        }
        Err(self.invalid(orientation))
    }

    /// `mirror` using `turn_within`, so the result is storable in `version`.
    pub fn mirror_within(
        self,
        orientation: Orientation,
        axis: Axis,
        version: FormatVersion,
    ) -> Result<Orientation, BlockError> {
        let about = mirror_turn_axis(axis);
        let once = self.turn_within(orientation, about, version)?;
        self.turn_within(once, about, version)
    }

    /// Every orientation value this style can represent in `version`.
    pub fn orientations(self, version: FormatVersion) -> Vec<Orientation> {
        match self.ops().layout {
            Layout::Facing => Facing::ALL.into_iter().map(Orientation::Facing).collect(),
            Layout::AxisRotation { .. } => (0..=self.max_axis(version))
                .flat_map(|axis| (0..4).map(move |rotations| Orientation::axis(axis, rotations)))
                .collect(),
        }
    }

    /// Orientation values that the turn tables act on.
    pub fn turnable_orientations(self, version: FormatVersion) -> Vec<Orientation> {
        self.orientations(version)
            .into_iter()
            .filter(|o| match o {
                Orientation::Facing(_) => true,
                Orientation::Axis(a) => (a.axis as usize) < FACE_COUNT,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_u8() {
        assert_eq!(Style::try_from(2), Ok(Style::Corner));
        assert_eq!(Style::try_from(7), Err(BlockError::InvalidStyle(7)));
    }

    #[test]
    fn test_canonical_turn_x() {
        let expected = [3u8, 2, 0, 1, 4, 5];
        for facing in Facing::ALL {
            let turned = Style::Facing
                .turn_x_90(Orientation::Facing(facing))
                .expect("facing turns");
            assert_eq!(
                turned,
                Orientation::Facing(Facing::from_index(expected[facing as usize]).expect("face"))
            );
        }
    }

    #[test]
    fn test_turn_cycle_all_styles() {
        for style in Style::ALL {
            for version in FormatVersion::ALL {
                for start in style.turnable_orientations(version) {
                    for axis in Axis::ALL {
                        let mut o = start;
                        for _ in 0..4 {
                            o = style.turn(o, axis).expect("turnable");
                        }
                        assert_eq!(o, start, "{style:?} {axis:?} {version:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_turn_within_stays_storable() {
        for style in Style::ALL {
            for version in FormatVersion::ALL {
                for start in style.turnable_orientations(version) {
                    for axis in Axis::ALL {
                        let mut o = start;
                        for _ in 0..4 {
                            o = style.turn_within(o, axis, version).expect("turnable");
                            style
                                .apply_orientation(PackedBlock::EMPTY, o, version)
                                .expect("storable");
                        }
                        assert_eq!(o, start, "{style:?} {axis:?} {version:?}");
                        let mirrored = style.mirror_within(start, axis, version).expect("mirror");
                        assert_eq!(
                            style.mirror_within(mirrored, axis, version),
                            Ok(start),
                            "{style:?} {axis:?} {version:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_legacy_wedge_turn_skips_high_axes() {
        let start = Orientation::axis(0, 1);
        assert_eq!(
            Style::Wedge.turn_within(start, Axis::Y, FormatVersion::V2),
            Ok(Orientation::axis(1, 1))
        );
        assert_eq!(
            Style::Wedge.turn_within(Orientation::axis(2, 0), Axis::Z, FormatVersion::V0),
            Ok(Orientation::axis(3, 0))
        );
        assert_eq!(
            Style::Wedge.turn_within(start, Axis::Y, FormatVersion::V3),
            Ok(Orientation::axis(4, 1))
        );
        // Extended styles keep the full table in legacy formats
        assert_eq!(
            Style::Corner.turn_within(start, Axis::Y, FormatVersion::V1),
            Ok(Orientation::axis(4, 1))
        );
    }

    #[test]
    fn test_mirror_involution_all_styles() {
        for style in Style::ALL {
            for start in style.turnable_orientations(FormatVersion::V3) {
                for axis in Axis::ALL {
                    let once = style.mirror(start, axis).expect("mirror");
                    let twice = style.mirror(once, axis).expect("mirror");
                    assert_eq!(twice, start, "{style:?} {axis:?}");
                }
            }
        }
    }

    #[test]
    fn test_mirror_x_swaps_front_back() {
        let mirrored = Style::Facing
            .mirror(Orientation::Facing(Facing::Front), Axis::X)
            .expect("mirror");
        assert_eq!(mirrored, Orientation::Facing(Facing::Back));
        let mirrored = Style::Facing
            .mirror(Orientation::Facing(Facing::Top), Axis::Y)
            .expect("mirror");
        assert_eq!(mirrored, Orientation::Facing(Facing::Bottom));
    }

    #[test]
    fn test_facing_layout_per_version() {
        let top = Orientation::Facing(Facing::Top);
        let legacy = Style::Facing
            .apply_orientation(PackedBlock::EMPTY, top, FormatVersion::V2)
            .expect("apply");
        assert_eq!(legacy.0, 2 << 20);
        let current = Style::Facing
            .apply_orientation(PackedBlock::EMPTY, top, FormatVersion::V3)
            .expect("apply");
        assert_eq!(current.0, 2 << 19);
    }

    #[test]
    fn test_orientation_roundtrip_every_style() {
        // Id and durability bits must survive an orientation rewrite
        let base = PackedBlock(0x7FF | (0x55 << 11));
        for style in Style::ALL {
            for version in FormatVersion::ALL {
                for o in style.orientations(version) {
                    let word = style.apply_orientation(base, o, version).expect("apply");
                    assert_eq!(style.orientation(word, version), Ok(o), "{style:?} {version:?}");
                    assert_eq!(word.bits(0, 18), base.bits(0, 18));
                }
            }
        }
    }

    #[test]
    fn test_extended_axis_uses_bit_19_before_v3() {
        let word = Style::Rail
            .apply_orientation(PackedBlock::EMPTY, Orientation::axis(5, 1), FormatVersion::V2)
            .expect("apply");
        assert_eq!(word.bits(19, 1), 1);
        assert_eq!(word.bits(22, 2), 1);
        assert_eq!(word.bits(20, 2), 1);
    }

    #[test]
    fn test_axis_out_of_domain_rejected() {
        let result = Style::Wedge.apply_orientation(
            PackedBlock::EMPTY,
            Orientation::axis(4, 0),
            FormatVersion::V2,
        );
        assert!(matches!(
            result,
            Err(BlockError::InvalidOrientation { style: 1, .. })
        ));
        let result = Style::Wedge.apply_orientation(
            PackedBlock::EMPTY,
            Orientation::axis(0, 4),
            FormatVersion::V3,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_orientation_kind_rejected() {
        let result = Style::Facing.apply_orientation(
            PackedBlock::EMPTY,
            Orientation::axis(0, 0),
            FormatVersion::V3,
        );
        assert!(result.is_err());
        assert!(Style::Hepta
            .turn(Orientation::Facing(Facing::Top), Axis::X)
            .is_err());
    }

    #[test]
    fn test_undecodable_facing_fails() {
        let word = PackedBlock(7 << 19);
        assert_eq!(
            Style::Facing.orientation(word, FormatVersion::V3),
            Err(BlockError::InvalidOrientation { style: 0, value: 7 })
        );
    }

    #[test]
    fn test_extended_axis_cannot_turn() {
        assert!(Style::Corner
            .turn(Orientation::axis(6, 0), Axis::Y)
            .is_err());
    }

    #[test]
    fn test_rail_bits_table() {
        let bits = Facing::Right.to_rail_bits();
        assert_eq!(
            bits,
            RailBits {
                high_axis_bit: 1,
                axis_bits: 0,
                rotations: 0
            }
        );
        assert_eq!(Facing::Top.to_rail_bits().orientation(), Orientation::axis(3, 2));
        assert_eq!(Facing::Front.to_rail_bits().orientation(), Orientation::axis(0, 2));
    }
}
