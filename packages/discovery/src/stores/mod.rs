//! Store implementations.

pub mod json_file;
pub mod memory;

pub use json_file::{JsonContentFile, JsonLocationFile};
pub use memory::{MemoryContentStore, MemoryLocationStore};
