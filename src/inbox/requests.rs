//! Creation flows for the action-bearing entities the state machine
//! consumes: team invites, sub-event affiliation invites, sponsorship/MoU
//! requests, registration-payment approvals, moderation reports, and admin
//! suspension notices.
//!
//! Duplicate checks here are advisory read-then-write checks; the store has
//! no uniqueness constraint backing them.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::errors::{Error, Result};
use crate::inbox::Caller;
use crate::inbox::approval::DEFAULT_INVITE_ROLE;
use crate::inbox::notify::{Notification, notify};
use crate::models::entity::{
    CreateInboxEntity, EntityMeta, EntityStatus, EntityType, InboxEntity, TeamKind, TeamRef,
};
use crate::models::event::{LinkStatus, SponsorLink};
use crate::models::registration::PaymentStatus;
use crate::models::team::{MemberStatus, OrganizerMember, OrganizerTeam, StudentMember};
use crate::models::user::UserRole;
use crate::stores::InboxStores;
use crate::utils::time::time_now;

fn pending_entity(
    kind: EntityType,
    title: String,
    description: String,
    from: &RecordId,
    to: Vec<RecordId>,
) -> CreateInboxEntity {
    CreateInboxEntity {
        kind,
        title,
        description: Some(description),
        from: from.clone(),
        to,
        status: EntityStatus::Pending,
        related_event: None,
        related_team: None,
        role: None,
        meta: None,
        created_at: time_now(),
    }
}

/// Invites a user into an organizer team. The membership lands `Pending`
/// right away; approval flips it, rejection removes it.
pub async fn invite_to_organizer_team(
    store: &dyn InboxStores,
    caller: &Caller,
    team_id: &RecordId,
    email: &str,
    role: Option<String>,
) -> Result<InboxEntity> {
    let mut team = store
        .organizer_team_by_id(team_id)
        .await?
        .ok_or(Error::NotFound("Team"))?;
    if team.leader != caller.id {
        return Err(Error::Forbidden("Only the team leader can send invitations"));
    }

    let user = store
        .user_by_email(email)
        .await?
        .ok_or(Error::NotFound("User"))?;

    if store.pending_team_invite_exists(&team.id, &user.id).await? {
        return Err(Error::Conflict(
            "An invitation has already been sent to this user",
        ));
    }
    if team.members.iter().any(|m| m.user == user.id) {
        return Err(Error::Conflict("User is already a member of this team"));
    }

    let role = role.unwrap_or_else(|| DEFAULT_INVITE_ROLE.to_string());
    team.members.push(OrganizerMember {
        user: user.id.clone(),
        role: role.clone(),
        status: MemberStatus::Pending,
    });
    team.updated_at = Some(time_now());
    store
        .save_organizer_team(&team)
        .await
        .map_err(Error::upstream)?;

    let mut data = pending_entity(
        EntityType::TeamInvite,
        format!("Invitation to join team: {}", team.name),
        format!(
            "You have been invited to join {} as a {}.",
            team.name, role
        ),
        &caller.id,
        vec![user.id],
    );
    data.related_team = Some(TeamRef {
        kind: TeamKind::OrganizerTeam,
        id: team.id.clone(),
    });
    data.role = Some(role);
    store.create_entity(data).await
}

pub async fn invite_to_student_team(
    store: &dyn InboxStores,
    caller: &Caller,
    team_id: &RecordId,
    email: &str,
) -> Result<InboxEntity> {
    let mut team = store
        .student_team_by_id(team_id)
        .await?
        .ok_or(Error::NotFound("Team"))?;
    if team.leader != caller.id {
        return Err(Error::Forbidden("Only the team leader can send invitations"));
    }

    let user = store
        .user_by_email_role(email, UserRole::Student)
        .await?
        .ok_or(Error::NotFound("User"))?;

    if store.pending_team_invite_exists(&team.id, &user.id).await? {
        return Err(Error::Conflict(
            "An invitation has already been sent to this user",
        ));
    }
    if team.members.iter().any(|m| m.member == user.id) {
        return Err(Error::Conflict("User is already a member of this team"));
    }

    team.members.push(StudentMember {
        member: user.id.clone(),
        status: MemberStatus::Pending,
    });
    team.updated_at = Some(time_now());
    store
        .save_student_team(&team)
        .await
        .map_err(Error::upstream)?;

    let mut data = pending_entity(
        EntityType::TeamInvite,
        format!("Invitation to join team: {}", team.team_name),
        format!("You have been invited to join {}.", team.team_name),
        &caller.id,
        vec![user.id],
    );
    data.related_team = Some(TeamRef {
        kind: TeamKind::StudentTeam,
        id: team.id.clone(),
    });
    store.create_entity(data).await
}

/// Invites the leader of a sub-event's team to affiliate that sub-event
/// under the caller's main event.
pub async fn invite_subevent(
    store: &dyn InboxStores,
    caller: &Caller,
    event_id: &RecordId,
    sub_event_id: &RecordId,
) -> Result<InboxEntity> {
    let main_event = store
        .event_by_id(event_id)
        .await?
        .ok_or(Error::NotFound("Event"))?;
    let main_team = owning_team(store, &main_event.created_by).await?;
    if main_team.leader != caller.id {
        return Err(Error::Forbidden(
            "Only the event's team leader can send sub-event invitations",
        ));
    }

    let sub_event = store
        .event_by_id(sub_event_id)
        .await?
        .ok_or(Error::NotFound("Sub-event"))?;
    let sub_team = owning_team(store, &sub_event.created_by).await?;
    let recipient = sub_team.leader.clone();

    if store
        .pending_subevent_invite_exists(&main_event.id, &sub_event.id, &recipient)
        .await?
    {
        return Err(Error::Conflict(
            "An invitation is already pending for this sub-event",
        ));
    }

    let mut data = pending_entity(
        EntityType::SubeventInvite,
        format!("Invitation to join {}", main_event.title),
        format!(
            "You are invited by {} to participate as a sub-event under {}.",
            main_team.name, main_event.title
        ),
        &caller.id,
        vec![recipient],
    );
    data.related_event = Some(main_event.id.clone());
    data.related_team = Some(TeamRef {
        kind: TeamKind::OrganizerTeam,
        id: sub_team.id.clone(),
    });
    data.meta = Some(EntityMeta {
        sub_event_id: Some(sub_event.id.clone()),
    });
    store.create_entity(data).await
}

/// Asks a sponsor to sponsor the caller's event. The event carries the
/// `Pending` sponsor link from request time; approval flips it.
pub async fn request_sponsorship(
    store: &dyn InboxStores,
    caller: &Caller,
    event_id: &RecordId,
    email: &str,
) -> Result<InboxEntity> {
    let (mut event, sponsor) = sponsor_request_parts(store, caller, event_id, email).await?;

    if event.sponsors.iter().any(|l| l.sponsor == sponsor.id) {
        return Err(Error::Conflict(
            "A sponsorship for this sponsor already exists",
        ));
    }
    event.sponsors.push(SponsorLink {
        sponsor: sponsor.id.clone(),
        status: LinkStatus::Pending,
    });
    event.updated_at = Some(time_now());
    store.save_event(&event).await.map_err(Error::upstream)?;

    let mut data = pending_entity(
        EntityType::SponsorshipReq,
        format!("Sponsorship request for {}", event.title),
        format!("You are requested to sponsor {}.", event.title),
        &caller.id,
        vec![sponsor.id],
    );
    data.related_event = Some(event.id.clone());
    store.create_entity(data).await
}

/// Asks a sponsor to sign an MoU for the caller's event; the sponsor link
/// is only written on approval.
pub async fn request_mou(
    store: &dyn InboxStores,
    caller: &Caller,
    event_id: &RecordId,
    email: &str,
) -> Result<InboxEntity> {
    let (event, sponsor) = sponsor_request_parts(store, caller, event_id, email).await?;

    let mut data = pending_entity(
        EntityType::MouReq,
        format!("MoU request for {}", event.title),
        format!("You are requested to sign an MoU for {}.", event.title),
        &caller.id,
        vec![sponsor.id],
    );
    data.related_event = Some(event.id.clone());
    store.create_entity(data).await
}

/// Submits the caller's registration payment for verification by the
/// event's team leader.
pub async fn request_registration_approval(
    store: &dyn InboxStores,
    caller: &Caller,
    event_id: &RecordId,
) -> Result<InboxEntity> {
    let event = store
        .event_by_id(event_id)
        .await?
        .ok_or(Error::NotFound("Event"))?;
    let mut registration = store
        .registration_by_event_and_student(&event.id, &caller.id)
        .await?
        .ok_or(Error::NotFound("Registration"))?;
    let team = owning_team(store, &event.created_by).await?;

    registration.payment_status = PaymentStatus::PendingApproval;
    registration.updated_at = Some(time_now());
    store
        .save_registration(&registration)
        .await
        .map_err(Error::upstream)?;

    let mut data = pending_entity(
        EntityType::RegistrationApproval,
        format!("Registration payment approval for {}", event.title),
        format!(
            "A registration payment for {} is awaiting verification.",
            event.title
        ),
        &caller.id,
        vec![team.leader],
    );
    data.related_event = Some(event.id.clone());
    store.create_entity(data).await
}

/// What a moderation report can point at. Creation and resolution consult
/// this same closed set, so the two cannot drift apart.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportTarget {
    Event,
    User,
}

impl ReportTarget {
    fn label(&self) -> &'static str {
        match self {
            ReportTarget::Event => "EVENT",
            ReportTarget::User => "USER",
        }
    }
}

/// Files a report against an event or a user. Every admin plus the
/// responsible owner is addressed.
pub async fn file_report(
    store: &dyn InboxStores,
    caller: &Caller,
    target: ReportTarget,
    target_id: &RecordId,
    reason: &str,
) -> Result<InboxEntity> {
    if reason.trim().is_empty() {
        return Err(Error::Validation("A reason for the report is required"));
    }

    let (entity_name, owner, related_event) = match target {
        ReportTarget::Event => {
            let event = store
                .event_by_id(target_id)
                .await?
                .ok_or(Error::NotFound("Reported event"))?;
            let owner = store
                .organizer_team_by_id(&event.created_by)
                .await?
                .map(|t| t.leader);
            (event.title.clone(), owner, Some(event.id))
        }
        ReportTarget::User => {
            let user = store
                .user_by_id(target_id)
                .await?
                .ok_or(Error::NotFound("Reported user"))?;
            let name = user.name.clone().unwrap_or_else(|| user.email.clone());
            (name, Some(user.id), None)
        }
    };

    let mut recipients: Vec<RecordId> = store
        .users_by_role(UserRole::Admin)
        .await?
        .into_iter()
        .map(|u| u.id)
        .collect();
    if let Some(owner) = owner {
        if !recipients.contains(&owner) {
            recipients.push(owner);
        }
    }
    if recipients.is_empty() {
        return Err(Error::Validation("Recipients required"));
    }

    let mut data = pending_entity(
        EntityType::Report,
        format!("Report Filed: {} - {}", target.label(), entity_name),
        format!("Reason: {}", reason.trim()),
        &caller.id,
        recipients,
    );
    data.related_event = related_event;
    store.create_entity(data).await
}

/// Admin-only, fire-and-forget notice to a user whose associated entity was
/// suspended or re-activated.
pub async fn send_suspension_notice(
    store: &dyn InboxStores,
    caller: &Caller,
    user_id: &RecordId,
    entity_name: &str,
    suspended: bool,
) -> Result<()> {
    if !caller.is_admin() {
        return Err(Error::Forbidden("Admin role required"));
    }
    let user = store
        .user_by_id(user_id)
        .await?
        .ok_or(Error::NotFound("User"))?;

    let action = if suspended { "suspended" } else { "reactivated" };
    let title = if suspended {
        format!("URGENT: {entity_name} Halted")
    } else {
        format!("{entity_name} is Active Again")
    };

    notify(
        store,
        Notification {
            kind: EntityType::Announcement,
            from: caller.id.clone(),
            to: vec![user.id],
            related_event: None,
            title,
            description: format!(
                "Your associated entity ({entity_name}) has been {action} by a System Administrator. Please contact the Admin for details."
            ),
        },
    )
    .await;
    Ok(())
}

async fn owning_team(store: &dyn InboxStores, team_id: &RecordId) -> Result<OrganizerTeam> {
    store
        .organizer_team_by_id(team_id)
        .await?
        .ok_or(Error::NotFound("Team"))
}

async fn sponsor_request_parts(
    store: &dyn InboxStores,
    caller: &Caller,
    event_id: &RecordId,
    email: &str,
) -> Result<(crate::models::event::Event, crate::models::user::User)> {
    let event = store
        .event_by_id(event_id)
        .await?
        .ok_or(Error::NotFound("Event"))?;
    let team = owning_team(store, &event.created_by).await?;
    if team.leader != caller.id {
        return Err(Error::Forbidden(
            "Only the event's team leader can contact sponsors",
        ));
    }
    let sponsor = store
        .user_by_email_role(email, UserRole::Sponsor)
        .await?
        .ok_or(Error::NotFound("Sponsor"))?;
    Ok((event, sponsor))
}
