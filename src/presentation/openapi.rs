use crate::presentation::handlers::faculties::{
    DeletionResultResource, FacultySummaryResource, RemovedCountsResource,
};
use crate::shared::error::{ApiError, ErrorResponse};
use crate::shared::response::ApiResponse;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Faculty Portal Administration API",
        version = "0.1.0",
        description = "Faculty directory and cascading faculty deletion for the university portal."
    ),
    paths(
        crate::presentation::handlers::faculties::list_faculties,
        crate::presentation::handlers::faculties::get_faculty,
        crate::presentation::handlers::faculties::delete_faculty,
    ),
    components(
        schemas(
            FacultySummaryResource,
            RemovedCountsResource,
            DeletionResultResource,
            ApiResponse<Vec<String>>,
            ApiResponse<FacultySummaryResource>,
            ErrorResponse,
            ApiError,
        )
    ),
    tags(
        (name = "faculties", description = "Faculty directory and deletion")
    ),
    modifiers(&SecurityAddon)
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
