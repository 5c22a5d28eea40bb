use std::{sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor};

use crate::{
    middleware::auth_jwt_middleware,
    routes::inbox_route::{
        admin::create_suspension_notice,
        approval::{approve_entity, reject_entity},
        drafts::{create_draft, delete_draft, edit_draft, read_drafts},
        messages::{read_arrivals, read_sent, send_direct, send_draft},
        requests::{
            create_mou_request, create_registration_approval_request, create_report,
            create_sponsorship_request, create_student_team_invite, create_subevent_invite,
            create_team_invite,
        },
    },
    state::AppState,
};

pub mod admin;
pub mod approval;
pub mod drafts;
pub mod messages;
pub mod requests;

pub fn inbox_router(config: AppState) -> Router<AppState> {
    // ? rate limiter for broadcast-capable direct sends
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(5)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );
    let governor_limiter = governor_conf.limiter().clone();
    let interval = Duration::from_secs(60);
    // a separate background task to clean up
    std::thread::spawn(move || {
        loop {
            std::thread::sleep(interval);
            tracing::info!("rate limiting storage size: {}", governor_limiter.len());
            governor_limiter.retain_recent();
        }
    });

    Router::new()
        // ! drafts
        .route("/drafts", post(create_draft))
        .route("/drafts", get(read_drafts))
        .route("/drafts/{draft_id}", put(edit_draft))
        .route("/drafts/{draft_id}", delete(delete_draft))
        .route("/drafts/{draft_id}/send", put(send_draft))
        // ! direct send & views
        .route(
            "/send",
            post(send_direct).layer(GovernorLayer {
                config: governor_conf,
            }),
        )
        .route("/sent", get(read_sent))
        .route("/arrivals", get(read_arrivals))
        // ! approval state machine
        .route("/approve/{id}", put(approve_entity))
        .route("/reject/{id}", put(reject_entity))
        // ! request creation
        .route("/requests/team-invite", post(create_team_invite))
        .route(
            "/requests/student-team-invite",
            post(create_student_team_invite),
        )
        .route("/requests/subevent-invite", post(create_subevent_invite))
        .route("/requests/sponsorship", post(create_sponsorship_request))
        .route("/requests/mou", post(create_mou_request))
        .route(
            "/requests/registration-approval",
            post(create_registration_approval_request),
        )
        .route("/reports", post(create_report))
        // ! admin
        .route("/admin/suspension-notice", post(create_suspension_notice))
        .layer(middleware::from_fn(auth_jwt_middleware))
        .with_state(config)
}
