use crate::types::{Position, SegmentOrigin};
use glam::IVec3;

/// Extract `len` bits of `word` starting at bit `offset`.
pub fn bits_parse(word: u32, offset: u32, len: u32) -> u32 {
    (word >> offset) & field_mask(len)
}

/// Overwrite `len` bits of `word` at `offset` with the low bits of `value`.
pub fn bits_combine(word: u32, value: u32, offset: u32, len: u32) -> u32 {
    let mask = field_mask(len) << offset;
    (word & !mask) | ((value << offset) & mask)
}

/// Mask of `len` low bits.
pub fn field_mask(len: u32) -> u32 {
    if len >= 32 {
        u32::MAX
    } else {
        (1u32 << len) - 1
    }
}

/// Origin of the segment containing `position`.
pub fn segment_origin(position: Position, side: u32) -> SegmentOrigin {
    let s = side as i32;
    IVec3::new(
        position.x.div_euclid(s) * s,
        position.y.div_euclid(s) * s,
        position.z.div_euclid(s) * s,
    )
}

/// Offset of `position` inside its segment, each component in `[0, side)`.
pub fn local_offset(position: Position, side: u32) -> IVec3 {
    let s = side as i32;
    IVec3::new(
        position.x.rem_euclid(s),
        position.y.rem_euclid(s),
        position.z.rem_euclid(s),
    )
}

/// Flat index of `position` inside its segment: `x + y*L + z*L^2`.
pub fn local_index(position: Position, side: u32) -> usize {
    let local = local_offset(position, side);
    let s = side as usize;
    local.x as usize + local.y as usize * s + local.z as usize * s * s
}

/// Global position of flat index `index` inside the segment at `origin`.
pub fn index_to_position(origin: SegmentOrigin, index: usize, side: u32) -> Position {
    let s = side as usize;
    let area = s * s;
    let z = index / area;
    let rest = index % area;
    let y = rest / s;
    let x = rest % s;
    origin + IVec3::new(x as i32, y as i32, z as i32)
}

/// Whether every component of `origin` is a multiple of `side`.
pub fn is_segment_aligned(origin: SegmentOrigin, side: u32) -> bool {
    let s = side as i32;
    origin.x.rem_euclid(s) == 0 && origin.y.rem_euclid(s) == 0 && origin.z.rem_euclid(s) == 0
}
