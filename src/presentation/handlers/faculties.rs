use crate::application::faculties::delete::{DeleteFacultyRequest, DeleteFacultyUseCase};
use crate::application::faculties::get::GetFacultySummaryUseCase;
use crate::application::faculties::list::ListFacultiesUseCase;
use crate::domain::deletion::{DeletionOutcome, DeletionScope, RemovedCounts};
use crate::domain::faculties::FacultySummary;
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::{AdminContext, AuthUser, FacultyPath};
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::query::Qs;
use crate::shared::response::ApiResponse;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteFacultyQuery {
    /// `true` also deletes the faculty's lecturer accounts; `false` or absent keeps all accounts
    #[param(example = "false")]
    pub delete_accounts: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemovedCountsResource {
    pub departments: u64,
    pub majors: u64,
    pub lecturer_assignments: u64,
    pub cnbm_designations: u64,
    pub records: u64,
    pub accounts: u64,
}

impl From<RemovedCounts> for RemovedCountsResource {
    fn from(removed: RemovedCounts) -> Self {
        Self {
            departments: removed.records.departments,
            majors: removed.records.majors,
            lecturer_assignments: removed.records.lecturer_assignments,
            cnbm_designations: removed.records.cnbm_designations,
            records: removed.records_total(),
            accounts: removed.accounts,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletionResultResource {
    pub success: bool,
    pub message: String,
    pub faculty: String,
    #[schema(example = "records_only")]
    pub scope: String,
    pub removed: RemovedCountsResource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<String>,
}

impl From<DeletionOutcome> for DeletionResultResource {
    fn from(outcome: DeletionOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
            faculty: outcome.faculty,
            scope: outcome.scope.to_string(),
            removed: outcome.removed.into(),
            failed_stage: outcome.failed_stage.map(|stage| stage.to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacultySummaryResource {
    pub name: String,
    pub departments: u64,
    pub majors: u64,
    pub lecturer_assignments: u64,
    pub cnbm_designations: u64,
    pub lecturers: u64,
    pub accounts: u64,
}

impl From<FacultySummary> for FacultySummaryResource {
    fn from(summary: FacultySummary) -> Self {
        Self {
            name: summary.name,
            departments: summary.records.departments,
            majors: summary.records.majors,
            lecturer_assignments: summary.records.lecturer_assignments,
            cnbm_designations: summary.records.cnbm_designations,
            lecturers: summary.lecturers,
            accounts: summary.accounts,
        }
    }
}

/// List faculty names
#[utoipa::path(
    get,
    path = "/api/v1/faculties",
    responses(
        (status = 200, description = "Faculty names in ascending order", body = ApiResponse<Vec<String>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "faculties"
)]
pub async fn list_faculties(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let use_case = ListFacultiesUseCase::new(state.records.clone(), state.accounts.clone());

    let names = use_case.execute().await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(names))))
}

/// Get a faculty summary
#[utoipa::path(
    get,
    path = "/api/v1/faculties/{faculty_id}",
    params(
        ("faculty_id" = String, Path, description = "Faculty name, percent-encoded")
    ),
    responses(
        (status = 200, description = "Faculty found", body = ApiResponse<FacultySummaryResource>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Nothing references this faculty", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "faculties"
)]
pub async fn get_faculty(
    State(state): State<AppState>,
    FacultyPath(faculty_id): FacultyPath,
    _auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let use_case = GetFacultySummaryUseCase::new(state.records.clone(), state.accounts.clone());

    match use_case.execute(&faculty_id).await? {
        Some(summary) => Ok((
            StatusCode::OK,
            Json(ApiResponse::new(FacultySummaryResource::from(summary))),
        )),
        None => Err(AppError::NotFound(format!(
            "Faculty '{}' not found",
            faculty_id
        ))),
    }
}

/// Delete a faculty's data
///
/// Records are always removed. With `deleteAccounts=true` the faculty's
/// lecturer accounts are removed too; administrator accounts never are.
/// Deleting a faculty with no data succeeds with zero counts.
#[utoipa::path(
    delete,
    path = "/api/v1/faculties/{faculty_id}",
    params(
        ("faculty_id" = String, Path, description = "Faculty name, percent-encoded"),
        DeleteFacultyQuery
    ),
    responses(
        (status = 200, description = "Faculty data deleted", body = DeletionResultResource),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 422, description = "Blank faculty name or invalid deleteAccounts value", body = ErrorResponse),
        (status = 500, description = "Cascade failed part-way; body carries what was already removed", body = DeletionResultResource)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "faculties"
)]
pub async fn delete_faculty(
    State(state): State<AppState>,
    FacultyPath(faculty_id): FacultyPath,
    admin: AdminContext,
    Qs(query): Qs<DeleteFacultyQuery>,
) -> Result<impl IntoResponse, AppError> {
    let scope = DeletionScope::from_delete_accounts_flag(query.delete_accounts.as_deref())?;

    tracing::info!(
        admin_id = %admin.account.id,
        faculty = %faculty_id,
        %scope,
        "faculty deletion requested"
    );

    let use_case = DeleteFacultyUseCase::new(state.records.clone(), state.accounts.clone());
    let outcome = use_case
        .execute(DeleteFacultyRequest { faculty_id, scope })
        .await?;

    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(DeletionResultResource::from(outcome))))
}
