// Re-export session models from the shared crate
pub use praxeum_models::sessions::*;
