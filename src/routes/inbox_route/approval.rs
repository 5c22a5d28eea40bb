use axum::{Extension, Json, extract::{Path, State}, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    errors::Result,
    inbox::{
        Caller,
        approval::{Decision, resolve_entity},
    },
    middleware::AuthUser,
    state::AppState,
    utils::get_record_id::get_record_id_from_string,
};

pub async fn approve_entity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let id = get_record_id_from_string(&id)?;

    let resolution = resolve_entity(state.store.as_ref(), &caller, &id, Decision::Approve).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": resolution.note,
            "data": resolution.entity,
        })),
    ))
}

pub async fn reject_entity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let id = get_record_id_from_string(&id)?;

    let resolution = resolve_entity(state.store.as_ref(), &caller, &id, Decision::Reject).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": resolution.note,
            "data": resolution.entity,
        })),
    ))
}
