pub mod compat;
pub mod compress;
pub mod error;
pub mod format;
pub mod load;
pub mod save;
pub mod segment;
pub mod subregion;

pub use error::{CorruptReason, PersistError};
pub use format::{SegmentConfig, SegmentHeader};
pub use load::{load_region, load_region_par, RecordFailure, RegionData};
pub use save::{index_from_segments, origin_bounds, save_region, segments_from_index};
pub use segment::Segment;
pub use subregion::export_subregion;
