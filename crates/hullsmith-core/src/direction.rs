use glam::IVec3;

/// Cartesian axis used by turn and mirror operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along the positive direction of this axis.
    pub fn unit(self) -> IVec3 {
        match self {
            Axis::X => IVec3::X,
            Axis::Y => IVec3::Y,
            Axis::Z => IVec3::Z,
        }
    }
}

/// Classification of a neighbor by how many axes it moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborKind {
    /// Shares a face (taxicab distance 1).
    Face,
    /// Shares an edge (taxicab distance 2).
    Edge,
    /// Shares only a corner (taxicab distance 3).
    Corner,
}

impl NeighborKind {
    /// Classify a neighbor offset. Returns None for the zero offset or
    /// anything outside the 3x3x3 neighborhood.
    pub fn of(offset: IVec3) -> Option<NeighborKind> {
        if offset.abs().max_element() != 1 {
            return None;
        }
        match offset.abs().element_sum() {
            1 => Some(NeighborKind::Face),
            2 => Some(NeighborKind::Edge),
            3 => Some(NeighborKind::Corner),
            _ => None,
        }
    }
}

/// The 6 face neighbor offsets.
pub const FACE_OFFSETS: [IVec3; 6] = [
    IVec3::new(-1, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, 0, -1),
    IVec3::new(0, 0, 1),
];

/// The 12 edge neighbor offsets.
pub const EDGE_OFFSETS: [IVec3; 12] = [
    // xy plane
    IVec3::new(-1, -1, 0),
    IVec3::new(-1, 1, 0),
    IVec3::new(1, -1, 0),
    IVec3::new(1, 1, 0),
    // xz plane
    IVec3::new(-1, 0, -1),
    IVec3::new(-1, 0, 1),
    IVec3::new(1, 0, -1),
    IVec3::new(1, 0, 1),
    // yz plane
    IVec3::new(0, -1, -1),
    IVec3::new(0, -1, 1),
    IVec3::new(0, 1, -1),
    IVec3::new(0, 1, 1),
];

/// The 8 corner neighbor offsets.
pub const CORNER_OFFSETS: [IVec3; 8] = [
    IVec3::new(-1, -1, -1),
    IVec3::new(-1, -1, 1),
    IVec3::new(-1, 1, -1),
    IVec3::new(-1, 1, 1),
    IVec3::new(1, -1, -1),
    IVec3::new(1, -1, 1),
    IVec3::new(1, 1, -1),
    IVec3::new(1, 1, 1),
];

/// All 26 neighbors of `position` with their classification.
pub fn neighbors(position: IVec3) -> impl Iterator<Item = (NeighborKind, IVec3)> {
    let faces = FACE_OFFSETS
        .into_iter()
        .map(move |o| (NeighborKind::Face, position + o));
    let edges = EDGE_OFFSETS
        .into_iter()
        .map(move |o| (NeighborKind::Edge, position + o));
    let corners = CORNER_OFFSETS
        .into_iter()
        .map(move |o| (NeighborKind::Corner, position + o));
    faces.chain(edges).chain(corners)
}
