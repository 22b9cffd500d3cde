//! Store module exports

pub mod file;
pub mod memory;
pub mod traits;
