//! The approval state machine: one entry point that dispatches on the
//! entity's kind, applies the kind-specific side effects against the
//! collaborator stores, then advances the entity's own status.
//!
//! Side effects run before the status flip, so a failed collaborator write
//! leaves the entity unresolved and retryable. The flip itself is a
//! conditional update; a resolution that loses the race gets `Conflict`.

use surrealdb::RecordId;

use crate::errors::{Error, Result};
use crate::inbox::Caller;
use crate::inbox::notify::{Notification, notify};
use crate::models::entity::{EntityStatus, EntityType, InboxEntity, TeamKind};
use crate::models::event::{LinkStatus, SponsorLink, SubEventLink};
use crate::models::registration::{PaymentStatus, RegistrationStatus};
use crate::models::team::{MemberStatus, OrganizerMember, StudentMember};
use crate::stores::InboxStores;
use crate::utils::time::time_now;

pub const DEFAULT_INVITE_ROLE: &str = "volunteer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub entity: InboxEntity,
    pub note: String,
}

pub async fn resolve_entity(
    store: &dyn InboxStores,
    caller: &Caller,
    id: &RecordId,
    decision: Decision,
) -> Result<Resolution> {
    let entity = store
        .entity_by_id(id)
        .await?
        .ok_or(Error::NotFound("Inbox item"))?;

    if !caller.is_admin() && !entity.to.contains(&caller.id) {
        return Err(Error::Forbidden(
            "Only a recipient or an admin can resolve this inbox item",
        ));
    }
    if entity.status.is_terminal() {
        return Err(Error::Conflict("Inbox item has already been resolved"));
    }
    if entity.status == EntityStatus::Draft {
        return Err(Error::InvalidState("Draft items cannot be resolved"));
    }

    let (note, fanout) = match decision {
        Decision::Approve => approve_side_effects(store, &entity).await?,
        Decision::Reject => (reject_side_effects(store, &entity).await?, None),
    };

    let status = match decision {
        Decision::Approve => EntityStatus::Approved,
        Decision::Reject => EntityStatus::Rejected,
    };
    let updated = store
        .transition_entity_status(id, status)
        .await?
        .ok_or(Error::Conflict("Inbox item has already been resolved"))?;

    if let Some(notification) = fanout {
        notify(store, notification).await;
    }

    Ok(Resolution {
        entity: updated,
        note,
    })
}

async fn approve_side_effects(
    store: &dyn InboxStores,
    entity: &InboxEntity,
) -> Result<(String, Option<Notification>)> {
    let note = match entity.kind {
        EntityType::Message | EntityType::Announcement | EntityType::Report => {
            format!("{} approved successfully", entity.kind.label())
        }
        EntityType::SponsorshipReq => {
            approve_sponsorship(store, entity).await?;
            "Sponsorship request approved successfully".to_string()
        }
        EntityType::MouReq => {
            approve_mou(store, entity).await?;
            "MoU request approved successfully".to_string()
        }
        EntityType::SubeventInvite => {
            approve_subevent_invite(store, entity).await?;
            "Subevent invitation approved successfully".to_string()
        }
        EntityType::TeamInvite => approve_team_invite(store, entity).await?.to_string(),
        EntityType::RegistrationApproval => {
            let notification = approve_registration(store, entity).await?;
            return Ok((
                "Registration approved successfully".to_string(),
                Some(notification),
            ));
        }
    };
    Ok((note, None))
}

/// Marks the sponsor's entry on the related event `Approved`, inserting it
/// if the entry went missing in the meantime.
async fn approve_sponsorship(store: &dyn InboxStores, entity: &InboxEntity) -> Result<()> {
    let sponsor = entity.first_recipient()?;
    let mut event = store
        .event_by_id(entity.related_event()?)
        .await?
        .ok_or(Error::NotFound("Event for sponsorship request"))?;

    match event.sponsors.iter_mut().find(|l| &l.sponsor == sponsor) {
        Some(link) => link.status = LinkStatus::Approved,
        None => event.sponsors.push(SponsorLink {
            sponsor: sponsor.clone(),
            status: LinkStatus::Approved,
        }),
    }
    event.updated_at = Some(time_now());
    store.save_event(&event).await.map_err(Error::upstream)
}

/// Attaches the sponsor to the event if it is not on the list yet; an
/// existing entry is left as it is.
async fn approve_mou(store: &dyn InboxStores, entity: &InboxEntity) -> Result<()> {
    let sponsor = entity.first_recipient()?;
    let mut event = store
        .event_by_id(entity.related_event()?)
        .await?
        .ok_or(Error::NotFound("Event for MoU request"))?;

    if !event.sponsors.iter().any(|l| &l.sponsor == sponsor) {
        event.sponsors.push(SponsorLink {
            sponsor: sponsor.clone(),
            status: LinkStatus::Approved,
        });
        event.updated_at = Some(time_now());
        store.save_event(&event).await.map_err(Error::upstream)?;
    }
    Ok(())
}

/// The recipient leads the team that owns the sub-event; its affiliation
/// entry on the main event becomes `Approved`.
async fn approve_subevent_invite(store: &dyn InboxStores, entity: &InboxEntity) -> Result<()> {
    let recipient = entity.first_recipient()?;
    let team = store
        .organizer_team_by_leader(recipient)
        .await?
        .ok_or(Error::NotFound("Team led by the recipient"))?;
    let subevent = store
        .event_by_created_by(&team.id)
        .await?
        .ok_or(Error::NotFound("Sub-event"))?;
    let mut main_event = store
        .event_by_id(entity.related_event()?)
        .await?
        .ok_or(Error::NotFound("Event"))?;

    match main_event
        .sub_events
        .iter_mut()
        .find(|l| l.subevent == subevent.id)
    {
        Some(link) => link.status = LinkStatus::Approved,
        None => main_event.sub_events.push(SubEventLink {
            subevent: subevent.id.clone(),
            status: LinkStatus::Approved,
        }),
    }
    main_event.updated_at = Some(time_now());
    store.save_event(&main_event).await.map_err(Error::upstream)
}

/// Find-or-append the invited user's membership record and mark it
/// `Approved`; organizer teams also take the offered role.
async fn approve_team_invite(
    store: &dyn InboxStores,
    entity: &InboxEntity,
) -> Result<&'static str> {
    let team_ref = entity.team_ref()?;
    let invited = entity.first_recipient()?;

    match team_ref.kind {
        TeamKind::OrganizerTeam => {
            let mut team = store
                .organizer_team_by_id(&team_ref.id)
                .await?
                .ok_or(Error::NotFound("Organizer team"))?;
            let role = entity
                .role
                .clone()
                .unwrap_or_else(|| DEFAULT_INVITE_ROLE.to_string());

            match team.members.iter_mut().find(|m| &m.user == invited) {
                Some(member) => {
                    member.role = role;
                    member.status = MemberStatus::Approved;
                }
                None => team.members.push(OrganizerMember {
                    user: invited.clone(),
                    role,
                    status: MemberStatus::Approved,
                }),
            }
            team.updated_at = Some(time_now());
            store
                .save_organizer_team(&team)
                .await
                .map_err(Error::upstream)?;
            Ok("Successfully joined the organizer team")
        }
        TeamKind::StudentTeam => {
            let mut team = store
                .student_team_by_id(&team_ref.id)
                .await?
                .ok_or(Error::NotFound("Student team"))?;

            match team.members.iter_mut().find(|m| &m.member == invited) {
                Some(member) => member.status = MemberStatus::Approved,
                None => team.members.push(StudentMember {
                    member: invited.clone(),
                    status: MemberStatus::Approved,
                }),
            }
            team.updated_at = Some(time_now());
            store
                .save_student_team(&team)
                .await
                .map_err(Error::upstream)?;
            Ok("Successfully joined the student team")
        }
    }
}

/// Confirms the submitter's registration and prepares the check-in-code
/// message sent back to them once the entity's own status has flipped.
async fn approve_registration(
    store: &dyn InboxStores,
    entity: &InboxEntity,
) -> Result<Notification> {
    let student = &entity.from;
    let event_id = entity.related_event()?;

    let mut registration = store
        .registration_by_event_and_student(event_id, student)
        .await?
        .ok_or(Error::NotFound("Registration"))?;

    registration.payment_status = PaymentStatus::Verified;
    registration.status = RegistrationStatus::Confirmed;
    registration.updated_at = Some(time_now());
    store
        .save_registration(&registration)
        .await
        .map_err(Error::upstream)?;

    let event_title = store
        .event_by_id(event_id)
        .await?
        .map(|e| e.title)
        .unwrap_or_else(|| "the event".to_string());

    Ok(Notification {
        kind: EntityType::Message,
        from: entity.first_recipient()?.clone(),
        to: vec![student.clone()],
        related_event: Some(event_id.clone()),
        title: format!("Registration approved for {event_title}"),
        description: format!(
            "Your registration for {event_title} has been approved. Your check-in code is {}.",
            registration.check_in_code
        ),
    })
}

/// A rejected team invite must not leave a dangling `Pending` membership
/// behind; other kinds only flip status.
async fn reject_side_effects(store: &dyn InboxStores, entity: &InboxEntity) -> Result<String> {
    if entity.kind == EntityType::TeamInvite {
        let team_ref = entity.team_ref()?;
        let invited = entity.first_recipient()?;

        match team_ref.kind {
            TeamKind::OrganizerTeam => {
                if let Some(mut team) = store.organizer_team_by_id(&team_ref.id).await? {
                    team.members.retain(|m| &m.user != invited);
                    team.updated_at = Some(time_now());
                    store
                        .save_organizer_team(&team)
                        .await
                        .map_err(Error::upstream)?;
                }
            }
            TeamKind::StudentTeam => {
                if let Some(mut team) = store.student_team_by_id(&team_ref.id).await? {
                    team.members.retain(|m| &m.member != invited);
                    team.updated_at = Some(time_now());
                    store
                        .save_student_team(&team)
                        .await
                        .map_err(Error::upstream)?;
                }
            }
        }
    }
    Ok(format!("{} rejected successfully", entity.kind.label()))
}
