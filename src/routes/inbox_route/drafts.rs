use axum::{Extension, Json, extract::{Path, State}, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    errors::Result,
    inbox::{
        Caller,
        drafts::{DraftPatch, DraftPayload},
        recipients::RecipientSpec,
    },
    middleware::AuthUser,
    models::entity::{EntityType, TeamKind, TeamRef},
    state::AppState,
    utils::{get_record_id::get_record_id_from_string, validated_form::ValidatedJson},
};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct CreateDraftRequest {
    #[serde(rename = "type")]
    pub kind: EntityType,
    #[validate(length(min = 1, max = 200))]
    pub title: String, // ! & (len = 200)
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub to: Option<Vec<RecipientSpec>>,
    pub related_event: Option<String>,
    pub related_team: Option<String>,
    pub related_team_model: Option<TeamKind>,
    pub role: Option<String>,
}

pub async fn create_draft(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<CreateDraftRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;

    let related_event = input
        .related_event
        .map(|id| get_record_id_from_string(&id))
        .transpose()?;
    let related_team = input
        .related_team
        .map(|id| get_record_id_from_string(&id))
        .transpose()?;
    let related_team = TeamRef::from_parts(related_team, input.related_team_model)?;

    let draft = crate::inbox::drafts::create_draft(
        state.store.as_ref(),
        &caller,
        DraftPayload {
            kind: input.kind,
            title: input.title,
            description: input.description,
            to: input.to.unwrap_or_default(),
            related_event,
            related_team,
            role: input.role,
            meta: None,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Draft created successfully",
            "data": draft,
        })),
    ))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct EditDraftRequest {
    #[serde(rename = "type")]
    pub kind: Option<EntityType>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub to: Option<Vec<RecipientSpec>>,
    pub related_event: Option<String>,
    pub related_team: Option<String>,
    pub related_team_model: Option<TeamKind>,
    pub role: Option<String>,
}

pub async fn edit_draft(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(draft_id): Path<String>,
    ValidatedJson(input): ValidatedJson<EditDraftRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let draft_id = get_record_id_from_string(&draft_id)?;

    let related_event = input
        .related_event
        .map(|id| get_record_id_from_string(&id))
        .transpose()?;
    let related_team = input
        .related_team
        .map(|id| get_record_id_from_string(&id))
        .transpose()?;
    let related_team = TeamRef::from_parts(related_team, input.related_team_model)?;

    let draft = crate::inbox::drafts::edit_draft(
        state.store.as_ref(),
        &caller,
        &draft_id,
        DraftPatch {
            kind: input.kind,
            title: input.title,
            description: input.description,
            to: input.to,
            related_event,
            related_team,
            role: input.role,
        },
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Draft updated successfully",
            "data": draft,
        })),
    ))
}

pub async fn delete_draft(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(draft_id): Path<String>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let draft_id = get_record_id_from_string(&draft_id)?;

    crate::inbox::drafts::delete_draft(state.store.as_ref(), &caller, &draft_id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Draft deleted successfully",
        })),
    ))
}

pub async fn read_drafts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let drafts = crate::inbox::drafts::list_drafts(state.store.as_ref(), &caller).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "count": drafts.len(),
            "data": drafts,
        })),
    ))
}
