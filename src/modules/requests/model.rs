// Re-export change request models from the shared crate
pub use praxeum_models::requests::*;
