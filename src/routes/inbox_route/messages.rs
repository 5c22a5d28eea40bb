use axum::{Extension, Json, extract::{Path, State}, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    errors::Result,
    inbox::{Caller, drafts::DraftPayload, recipients::RecipientSpec},
    middleware::AuthUser,
    models::entity::{EntityType, TeamKind, TeamRef},
    state::AppState,
    utils::{get_record_id::get_record_id_from_string, validated_form::ValidatedJson},
};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct SendDraftRequest {
    pub to: Option<Vec<String>>, // already-resolved recipient ids
}

pub async fn send_draft(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(draft_id): Path<String>,
    ValidatedJson(input): ValidatedJson<SendDraftRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let draft_id = get_record_id_from_string(&draft_id)?;

    let to_override = input
        .to
        .map(|ids| {
            ids.iter()
                .map(|id| get_record_id_from_string(id))
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;

    let message =
        crate::inbox::drafts::send_draft(state.store.as_ref(), &caller, &draft_id, to_override)
            .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Message sent successfully",
            "data": message,
        })),
    ))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct SendDirectRequest {
    #[serde(rename = "type")]
    pub kind: EntityType,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub to: Vec<RecipientSpec>,
    pub related_event: Option<String>,
    pub related_team: Option<String>,
    pub related_team_model: Option<TeamKind>,
    pub role: Option<String>,
}

pub async fn send_direct(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<SendDirectRequest>,
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

    let message = crate::inbox::drafts::send_direct(
        state.store.as_ref(),
        &caller,
        DraftPayload {
            kind: input.kind,
            title: input.title,
            description: input.description,
            to: input.to,
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
            "message": "Message sent successfully",
            "data": message,
        })),
    ))
}

pub async fn read_sent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let sent = crate::inbox::drafts::list_sent(state.store.as_ref(), &caller).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "count": sent.len(),
            "data": sent,
        })),
    ))
}

pub async fn read_arrivals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let arrivals = crate::inbox::drafts::list_arrivals(state.store.as_ref(), &caller).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "count": arrivals.len(),
            "data": arrivals,
        })),
    ))
}
