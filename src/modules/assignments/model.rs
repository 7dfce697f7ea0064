// Re-export assignment models from the shared crate
pub use praxeum_models::assignments::*;
