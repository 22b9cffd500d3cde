//! Store module exports

pub mod memory;
pub mod traits;
