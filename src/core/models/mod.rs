// src/core/models/mod.rs

pub mod weekly;
pub mod comparison;
pub mod report;

pub use weekly::*;
pub use comparison::*;
pub use report::*;
