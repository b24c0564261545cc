pub mod round_builders;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use round_builders::{round_with_misses, RoundBuilder};
