use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::errors::{Error, Result};

/// Closed set of workflow kinds a single inbox record can carry. The two
/// `*_request` aliases are accepted on the wire for compatibility with the
/// older clients.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Announcement,
    Message,
    TeamInvite,
    SubeventInvite,
    #[serde(alias = "sponsorship_request")]
    SponsorshipReq,
    MouReq,
    #[serde(alias = "registration_approval_request")]
    RegistrationApproval,
    Report,
}

impl EntityType {
    /// Request-bearing kinds start life `Pending` and are resolved through
    /// approve/reject; plain messages start as `Draft` or `Sent`.
    pub fn is_request(&self) -> bool {
        !matches!(self, EntityType::Announcement | EntityType::Message)
    }

    pub fn requires_related_team(&self) -> bool {
        matches!(self, EntityType::TeamInvite)
    }

    pub fn requires_related_event(&self) -> bool {
        matches!(
            self,
            EntityType::SubeventInvite
                | EntityType::SponsorshipReq
                | EntityType::MouReq
                | EntityType::RegistrationApproval
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Announcement => "announcement",
            EntityType::Message => "message",
            EntityType::TeamInvite => "team_invite",
            EntityType::SubeventInvite => "subevent_invite",
            EntityType::SponsorshipReq => "sponsorship_req",
            EntityType::MouReq => "mou_req",
            EntityType::RegistrationApproval => "registration_approval",
            EntityType::Report => "report",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityStatus {
    Draft,
    Sent,
    Pending,
    Approved,
    Rejected,
}

impl EntityStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EntityStatus::Approved | EntityStatus::Rejected)
    }
}

/// Which physical collection a related team lives in.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamKind {
    OrganizerTeam,
    StudentTeam,
}

/// Weak, type-tagged reference to a team in either team collection.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TeamRef {
    pub kind: TeamKind,
    pub id: RecordId,
}

impl TeamRef {
    /// Builds the tagged reference from the two wire fields. A team id
    /// without a kind tag is rejected.
    pub fn from_parts(team: Option<RecordId>, kind: Option<TeamKind>) -> Result<Option<TeamRef>> {
        match (team, kind) {
            (Some(id), Some(kind)) => Ok(Some(TeamRef { kind, id })),
            (Some(_), None) => Err(Error::Validation(
                "related_team_model is required when related_team is set",
            )),
            (None, _) => Ok(None),
        }
    }
}

/// Auxiliary identifiers a specific kind needs; today only the sub-event id
/// carried by `subevent_invite` for duplicate suppression.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct EntityMeta {
    pub sub_event_id: Option<RecordId>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InboxEntity {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub title: String, // ! & (len = 200)
    pub description: Option<String>,
    pub from: RecordId,
    pub to: Vec<RecordId>,
    pub status: EntityStatus,
    pub related_event: Option<RecordId>,
    pub related_team: Option<TeamRef>,
    pub role: Option<String>,
    pub meta: Option<EntityMeta>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl InboxEntity {
    /// Single-recipient convention: request handlers act on the first
    /// recipient.
    pub fn first_recipient(&self) -> Result<&RecordId> {
        self.to.first().ok_or(Error::Validation("Entity has no recipients"))
    }

    pub fn team_ref(&self) -> Result<&TeamRef> {
        self.related_team
            .as_ref()
            .ok_or(Error::Validation("Entity has no related team"))
    }

    pub fn related_event(&self) -> Result<&RecordId> {
        self.related_event
            .as_ref()
            .ok_or(Error::Validation("Entity has no related event"))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateInboxEntity {
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub title: String,
    pub description: Option<String>,
    pub from: RecordId,
    pub to: Vec<RecordId>,
    pub status: EntityStatus,
    pub related_event: Option<RecordId>,
    pub related_team: Option<TeamRef>,
    pub role: Option<String>,
    pub meta: Option<EntityMeta>,
    pub created_at: String,
}
