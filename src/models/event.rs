use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Pending,
    Approved,
    Rejected,
}

/// A sub-event affiliated to a main event; `status` tracks the affiliation
/// approval, not the sub-event's own lifecycle.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SubEventLink {
    pub subevent: RecordId,
    pub status: LinkStatus,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SponsorLink {
    pub sponsor: RecordId,
    pub status: LinkStatus,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Event {
    pub id: RecordId,
    pub title: String,
    pub created_by: RecordId, // ! organizer team id
    pub sub_events: Vec<SubEventLink>,
    pub sponsors: Vec<SponsorLink>,
    pub created_at: String,
    pub updated_at: Option<String>,
}
