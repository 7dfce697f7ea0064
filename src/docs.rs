use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use praxeum_core::{PaginationMeta, PaginationParams};
use praxeum_models::assignments::{AssignmentWithTeacher, TeachingAssignment};
use praxeum_models::enums::{
    AssignmentStatus, Modality, RequestKind, RequestStatus, ResourceKind, SessionStatus, UserRole,
};
use praxeum_models::requests::{
    ApproveChangeRequestDto, ChangeRequest, ChangeRequestFilterParams, ChangeRequestWithContext,
    DeclineSwapDto, PaginatedChangeRequestsResponse, RejectChangeRequestDto,
    SubmitChangeRequestDto,
};
use praxeum_models::resources::{
    AvailabilityQuery, AvailabilityResponse, OccupancyQuery, OccupiedSlot,
    PaginatedResourcesResponse, Resource, ResourceFilterParams,
};
use praxeum_models::sessions::{
    ClassSession, PaginatedSessionsResponse, SessionFilterParams, SessionWithContext,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::requests::controller::submit_request,
        crate::modules::requests::controller::get_requests,
        crate::modules::requests::controller::get_my_requests,
        crate::modules::requests::controller::get_request_by_id,
        crate::modules::requests::controller::approve_request,
        crate::modules::requests::controller::reject_request,
        crate::modules::requests::controller::confirm_swap,
        crate::modules::requests::controller::decline_swap,
        crate::modules::sessions::controller::get_sessions,
        crate::modules::sessions::controller::get_session_by_id,
        crate::modules::assignments::controller::get_session_assignments,
        crate::modules::availability::controller::check_availability,
        crate::modules::availability::controller::get_occupancy,
        crate::modules::resources::controller::get_resources,
        crate::modules::resources::controller::get_resource_by_id,
    ),
    components(
        schemas(
            ChangeRequest,
            ChangeRequestWithContext,
            SubmitChangeRequestDto,
            ApproveChangeRequestDto,
            RejectChangeRequestDto,
            DeclineSwapDto,
            ChangeRequestFilterParams,
            PaginatedChangeRequestsResponse,
            RequestKind,
            RequestStatus,
            ClassSession,
            SessionWithContext,
            SessionFilterParams,
            PaginatedSessionsResponse,
            SessionStatus,
            Modality,
            TeachingAssignment,
            AssignmentWithTeacher,
            AssignmentStatus,
            Resource,
            ResourceKind,
            ResourceFilterParams,
            PaginatedResourcesResponse,
            AvailabilityQuery,
            AvailabilityResponse,
            OccupancyQuery,
            OccupiedSlot,
            UserRole,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Change Requests", description = "Teacher schedule-change workflow"),
        (name = "Sessions", description = "Class session read surface"),
        (name = "Availability", description = "Resource availability and occupancy"),
        (name = "Resources", description = "Bookable resource catalog")
    ),
    info(
        title = "Praxeum API",
        version = "0.1.0",
        description = "Training-center operations backend built with Rust, Axum, and PostgreSQL. Centered on the teacher schedule-change workflow and its resource-conflict arbitration.",
        contact(
            name = "API Support",
            email = "support@praxeum.io"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
