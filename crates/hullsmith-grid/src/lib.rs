//! Sparse voxel index plus the editing passes that run over it: periphery
//! flood-fill, auto-shape write-back and hull/block replacement.

pub mod autoshape;
pub mod block_list;
pub mod periphery;
pub mod replace;

pub use autoshape::{apply_shapes, ShapeClassifier};
pub use block_list::BlockList;
pub use periphery::{Annotation, PeripheryAnalyzer, PeripheryWeight};
pub use replace::{convert_rails, replace_blocks, replace_hull};
