//! Admin and moderation endpoints.
//!
//! Authorization lives in `ModerationService`; every handler hands the
//! caller's id down and lets the service reject non-admins.

use axum::{extract::State, routing::post, Router};
use savora_common::AppResult;
use savora_core::{BanDurationUnit, BanUserInput};
use savora_db::entities::report::{ReportStatus, ReportTargetType};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::reports::ReportResponse,
    endpoints::users::UserResponse,
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// List reports request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsRequest {
    #[serde(default)]
    pub status: Option<ReportStatus>,
    #[serde(default)]
    pub target_type: Option<ReportTargetType>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    30
}

/// List reports for the moderation queue.
async fn list_reports(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListReportsRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let reports = state
        .moderation_service
        .list_reports(&user.id, req.status, req.target_type, req.limit, req.offset)
        .await?;

    Ok(ApiResponse::ok(reports.into_iter().map(Into::into).collect()))
}

/// Pending report count, for the moderation dashboard badge.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCountResponse {
    pub pending: u64,
}

async fn pending_report_count(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<PendingCountResponse>> {
    let pending = state.moderation_service.pending_report_count(&user.id).await?;
    Ok(ApiResponse::ok(PendingCountResponse { pending }))
}

/// Show report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowReportRequest {
    pub report_id: String,
}

/// Get a single report.
async fn show_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .moderation_service
        .get_report(&user.id, &req.report_id)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Update report status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportStatusRequest {
    pub report_id: String,
    pub status: ReportStatus,
}

/// Move a report out of `pending`.
async fn update_report_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateReportStatusRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .moderation_service
        .update_report_status(&user.id, &req.report_id, req.status)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Delete report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReportRequest {
    pub report_id: String,
}

/// Delete a report.
async fn delete_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteReportRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .moderation_service
        .delete_report(&user.id, &req.report_id)
        .await?;
    Ok(ApiResponse::<()>::message("Report deleted"))
}

/// Ban request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanUserRequest {
    pub user_id: String,
    pub duration: i64,
    pub unit: BanDurationUnit,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Banned user response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannedUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub ban_expires_at: Option<String>,
    pub ban_reason: Option<String>,
}

impl From<savora_db::entities::user::Model> for BannedUserResponse {
    fn from(user: savora_db::entities::user::Model) -> Self {
        let ban_expires_at = user.ban_expires_at.map(|t| t.to_rfc3339());
        let ban_reason = user.ban_reason.clone();
        Self {
            user: user.into(),
            ban_expires_at,
            ban_reason,
        }
    }
}

/// Ban a user for a bounded duration.
async fn ban(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BanUserRequest>,
) -> AppResult<ApiResponse<BannedUserResponse>> {
    let banned = state
        .moderation_service
        .ban_user(
            &user.id,
            &req.user_id,
            BanUserInput {
                duration: req.duration,
                unit: req.unit,
                reason: req.reason,
            },
        )
        .await?;

    Ok(ApiResponse::ok(banned.into()))
}

/// Unban request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnbanUserRequest {
    pub user_id: String,
}

/// Lift a ban early.
async fn unban(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UnbanUserRequest>,
) -> AppResult<ApiResponse<BannedUserResponse>> {
    let unbanned = state
        .moderation_service
        .unban_user(&user.id, &req.user_id)
        .await?;

    Ok(ApiResponse::ok(unbanned.into()))
}

/// Banned users listing request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBannedRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// List users whose ban is still in force.
async fn list_banned(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListBannedRequest>,
) -> AppResult<ApiResponse<Vec<BannedUserResponse>>> {
    let users = state
        .moderation_service
        .list_banned_users(&user.id, req.limit)
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Set-active request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub user_id: String,
    pub active: bool,
}

/// Activate or deactivate an account.
async fn set_active(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SetActiveRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .moderation_service
        .set_active(&user.id, &req.user_id, req.active)
        .await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Set-admin request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminRequest {
    pub user_id: String,
    pub is_admin: bool,
}

/// Grant or revoke admin privileges.
async fn set_admin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SetAdminRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .moderation_service
        .set_admin(&user.id, &req.user_id, req.is_admin)
        .await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports/list", post(list_reports))
        .route("/reports/show", post(show_report))
        .route("/reports/pending-count", post(pending_report_count))
        .route("/reports/update-status", post(update_report_status))
        .route("/reports/delete", post(delete_report))
        .route("/ban", post(ban))
        .route("/unban", post(unban))
        .route("/banned", post(list_banned))
        .route("/set-active", post(set_active))
        .route("/set-admin", post(set_admin))
}
