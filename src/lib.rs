pub mod config;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod patterns;
pub mod probe;
pub mod report;
pub mod utils;

// re-export the core value types used in tests
pub use crate::model::*;
