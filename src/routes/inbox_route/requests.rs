use axum::{Extension, Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    errors::Result,
    inbox::{Caller, requests, requests::ReportTarget},
    middleware::AuthUser,
    state::AppState,
    utils::{get_record_id::get_record_id_from_string, validated_form::ValidatedJson},
};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct TeamInviteRequest {
    pub team_id: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    pub role: Option<String>, // ! (default volunteer) & (len = 50)
}

pub async fn create_team_invite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<TeamInviteRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let team_id = get_record_id_from_string(&input.team_id)?;

    let invitation = requests::invite_to_organizer_team(
        state.store.as_ref(),
        &caller,
        &team_id,
        &input.email,
        input.role,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Invitation sent successfully",
            "data": invitation,
        })),
    ))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct StudentTeamInviteRequest {
    pub team_id: String,
    #[validate(email, length(max = 255))]
    pub email: String,
}

pub async fn create_student_team_invite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<StudentTeamInviteRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let team_id = get_record_id_from_string(&input.team_id)?;

    let invitation =
        requests::invite_to_student_team(state.store.as_ref(), &caller, &team_id, &input.email)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Invitation sent successfully",
            "data": invitation,
        })),
    ))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct SubeventInviteRequest {
    pub event_id: String,
    pub sub_event_id: String,
}

pub async fn create_subevent_invite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<SubeventInviteRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let event_id = get_record_id_from_string(&input.event_id)?;
    let sub_event_id = get_record_id_from_string(&input.sub_event_id)?;

    let invitation =
        requests::invite_subevent(state.store.as_ref(), &caller, &event_id, &sub_event_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Sub-event invitation sent successfully",
            "data": invitation,
        })),
    ))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct SponsorContactRequest {
    pub event_id: String,
    #[validate(email, length(max = 255))]
    pub email: String,
}

pub async fn create_sponsorship_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<SponsorContactRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let event_id = get_record_id_from_string(&input.event_id)?;

    let request =
        requests::request_sponsorship(state.store.as_ref(), &caller, &event_id, &input.email)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Sponsorship request sent successfully",
            "data": request,
        })),
    ))
}

pub async fn create_mou_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<SponsorContactRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let event_id = get_record_id_from_string(&input.event_id)?;

    let request =
        requests::request_mou(state.store.as_ref(), &caller, &event_id, &input.email).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "MoU request sent successfully",
            "data": request,
        })),
    ))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct RegistrationApprovalRequest {
    pub event_id: String,
}

pub async fn create_registration_approval_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<RegistrationApprovalRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let event_id = get_record_id_from_string(&input.event_id)?;

    let request =
        requests::request_registration_approval(state.store.as_ref(), &caller, &event_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration submitted for approval",
            "data": request,
        })),
    ))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct CreateReportRequest {
    pub target: ReportTarget,
    pub id: String,
    #[validate(length(min = 1, max = 2000))]
    pub reason: String,
}

pub async fn create_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<CreateReportRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let target_id = get_record_id_from_string(&input.id)?;

    let report = requests::file_report(
        state.store.as_ref(),
        &caller,
        input.target,
        &target_id,
        &input.reason,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Report filed successfully. Admin and the responsible party have been notified.",
            "data": { "reportId": report.id },
        })),
    ))
}
