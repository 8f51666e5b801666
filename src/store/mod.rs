//! Persistence module
//!
//! Line-format codec and the data files it is written to.

pub mod codec;
pub mod files;

pub use codec::LoadReport;
pub use files::{default_data_dir, DataFiles, StoreError, StoreResult};
