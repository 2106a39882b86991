//! Data types for the discovery pipeline.

pub mod config;
pub mod content;
pub mod coordinates;
pub mod location;
