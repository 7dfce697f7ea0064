// Re-export availability models from the shared crate
pub use praxeum_models::resources::{
    AvailabilityQuery, AvailabilityResponse, OccupancyQuery, OccupiedSlot,
};
