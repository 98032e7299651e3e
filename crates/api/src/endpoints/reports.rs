//! Report endpoints.

use axum::{extract::State, routing::post, Router};
use savora_common::AppResult;
use savora_core::CreateReportInput;
use savora_db::entities::report::{self, ReportReason, ReportStatus, ReportTargetType};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub reporter_id: String,
    pub target_type: ReportTargetType,
    pub target_id: String,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<report::Model> for ReportResponse {
    fn from(report: report::Model) -> Self {
        Self {
            id: report.id,
            reporter_id: report.reporter_id,
            target_type: report.target_type,
            target_id: report.target_id,
            reason: report.reason,
            description: report.description,
            status: report.status,
            created_at: report.created_at.to_rfc3339(),
            updated_at: report.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Create report request.
///
/// `target_type` and `reason` deserialize straight into the enums, so an
/// unknown string is rejected before the handler runs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub target_type: ReportTargetType,
    pub target_id: String,
    pub reason: ReportReason,
    #[serde(default)]
    pub description: Option<String>,
}

/// File a report against content or a user.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .moderation_service
        .create_report(
            &user.id,
            CreateReportInput {
                target_type: req.target_type,
                target_id: req.target_id,
                reason: req.reason,
                description: req.description,
            },
        )
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Create the reports router.
pub fn router() -> Router<AppState> {
    Router::new().route("/create", post(create))
}
