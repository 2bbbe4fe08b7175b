//! Adapter implementations
//!
//! Concrete implementations of the store port plus demo data generation.

pub mod demo;
pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
