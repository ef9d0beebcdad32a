//! Data-driven block catalog: RON loading, validation and the embedded defaults.

pub mod defaults;
pub mod loader;
pub mod validator;

pub use defaults::builtin_catalog;
pub use loader::{load_all_blocks, load_blocks_from_str, load_catalog, LoadError};
pub use validator::{validate_blocks, ValidationError};
