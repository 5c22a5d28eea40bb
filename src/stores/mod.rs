//! Typed store interfaces for the inbox engine.
//!
//! Every collaborator collection is reached through a narrow trait so the
//! approval state machine never resolves a collection by name at runtime.
//! `InboxStores` combines them for injection as a single handle.

pub mod surreal;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use surrealdb::RecordId;

use crate::errors::Result;
use crate::models::{
    entity::{CreateInboxEntity, EntityStatus, InboxEntity},
    event::Event,
    registration::Registration,
    team::{OrganizerTeam, StudentTeam},
    user::{College, User, UserRole},
};

pub use surreal::SurrealStore;

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn create_entity(&self, data: CreateInboxEntity) -> Result<InboxEntity>;

    async fn entity_by_id(&self, id: &RecordId) -> Result<Option<InboxEntity>>;

    /// Full write-back of a draft after an edit.
    async fn replace_entity(&self, entity: &InboxEntity) -> Result<InboxEntity>;

    async fn delete_entity(&self, id: &RecordId) -> Result<()>;

    /// Conditional status flip: succeeds only while the entity is still in a
    /// non-terminal state, so of two racing resolutions exactly one wins.
    /// Returns the updated entity, or `None` when the guard failed.
    async fn transition_entity_status(
        &self,
        id: &RecordId,
        status: EntityStatus,
    ) -> Result<Option<InboxEntity>>;

    async fn drafts_by_owner(&self, owner: &RecordId) -> Result<Vec<InboxEntity>>;

    /// Everything the owner has let out of the draft state, newest first.
    async fn sent_by_owner(&self, owner: &RecordId) -> Result<Vec<InboxEntity>>;

    async fn arrivals_for(&self, recipient: &RecordId) -> Result<Vec<InboxEntity>>;

    async fn pending_team_invite_exists(
        &self,
        team: &RecordId,
        recipient: &RecordId,
    ) -> Result<bool>;

    async fn pending_subevent_invite_exists(
        &self,
        event: &RecordId,
        sub_event: &RecordId,
        recipient: &RecordId,
    ) -> Result<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn user_by_id(&self, id: &RecordId) -> Result<Option<User>>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn user_by_email_role(&self, email: &str, role: UserRole) -> Result<Option<User>>;

    async fn users_all(&self) -> Result<Vec<User>>;

    async fn users_by_role(&self, role: UserRole) -> Result<Vec<User>>;

    async fn users_by_college(&self, college: &RecordId) -> Result<Vec<User>>;
}

#[async_trait]
pub trait CollegeStore: Send + Sync {
    async fn college_by_name(&self, name: &str) -> Result<Option<College>>;
}

#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn organizer_team_by_id(&self, id: &RecordId) -> Result<Option<OrganizerTeam>>;

    async fn organizer_team_by_leader(&self, leader: &RecordId) -> Result<Option<OrganizerTeam>>;

    async fn save_organizer_team(&self, team: &OrganizerTeam) -> Result<()>;
}

#[async_trait]
pub trait StudentTeamStore: Send + Sync {
    async fn student_team_by_id(&self, id: &RecordId) -> Result<Option<StudentTeam>>;

    async fn save_student_team(&self, team: &StudentTeam) -> Result<()>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn event_by_id(&self, id: &RecordId) -> Result<Option<Event>>;

    /// The event a given organizer team created, if any (sub-event lookup).
    async fn event_by_created_by(&self, team: &RecordId) -> Result<Option<Event>>;

    async fn save_event(&self, event: &Event) -> Result<()>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn registration_by_event_and_student(
        &self,
        event: &RecordId,
        student: &RecordId,
    ) -> Result<Option<Registration>>;

    async fn save_registration(&self, registration: &Registration) -> Result<()>;
}

/// Combined store handle injected into the inbox engine.
pub trait InboxStores:
    EntityStore
    + UserStore
    + CollegeStore
    + TeamStore
    + StudentTeamStore
    + EventStore
    + RegistrationStore
{
}

impl<T> InboxStores for T where
    T: EntityStore
        + UserStore
        + CollegeStore
        + TeamStore
        + StudentTeamStore
        + EventStore
        + RegistrationStore
{
}
