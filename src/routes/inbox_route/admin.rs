use axum::{Extension, Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    errors::Result,
    inbox::{Caller, requests::send_suspension_notice},
    middleware::AuthUser,
    state::AppState,
    utils::{get_record_id::get_record_id_from_string, validated_form::ValidatedJson},
};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct SuspensionNoticeRequest {
    pub user_id: String,
    #[validate(length(min = 1, max = 255))]
    pub entity_name: String,
    pub suspended: bool,
}

pub async fn create_suspension_notice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<SuspensionNoticeRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let caller = Caller::from_auth(&user)?;
    let user_id = get_record_id_from_string(&input.user_id)?;

    send_suspension_notice(
        state.store.as_ref(),
        &caller,
        &user_id,
        &input.entity_name,
        input.suspended,
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Notification queued",
        })),
    ))
}
