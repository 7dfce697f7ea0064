// Re-export resource models from the shared crate
pub use praxeum_models::resources::{
    PaginatedResourcesResponse, Resource, ResourceFilterParams,
};
