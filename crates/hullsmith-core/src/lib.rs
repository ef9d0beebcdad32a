//! Block words, their versioned bit codec, orientation styles and the block catalog.

pub mod catalog;
pub mod codec;
pub mod constants;
pub mod direction;
pub mod error;
pub mod math;
pub mod orientation;
pub mod types;

pub use catalog::{BlockCatalog, BlockDef, HullDetails, HullShape};
pub use codec::{decode, encode, encode_new, BlockFields, BlockUpdate};
pub use direction::{Axis, NeighborKind};
pub use error::BlockError;
pub use orientation::{AxisRotation, Facing, Orientation, RailBits, Style};
pub use types::{BlockId, FormatVersion, PackedBlock, Position, SegmentOrigin};
