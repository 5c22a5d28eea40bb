use async_trait::async_trait;
use surrealdb::{RecordId, Surreal, engine::remote::ws::Client};

use crate::consts::inbox_const::{
    COLLEGE_TABLE, EVENT_TABLE, INBOX_TABLE, ORGANIZER_TEAM_TABLE, REGISTRATION_TABLE,
    STUDENT_TEAM_TABLE, USER_TABLE,
};
use crate::errors::{Error, Result};
use crate::models::{
    entity::{CreateInboxEntity, EntityStatus, EntityType, InboxEntity},
    event::Event,
    registration::Registration,
    team::{OrganizerTeam, StudentTeam},
    user::{College, User, UserRole},
};
use crate::stores::{
    CollegeStore, EntityStore, EventStore, RegistrationStore, StudentTeamStore, TeamStore,
    UserStore,
};
use crate::utils::time::time_now;

#[derive(Debug, Clone)]
pub struct SurrealStore {
    sdb: Surreal<Client>,
}

impl SurrealStore {
    pub fn new(sdb: Surreal<Client>) -> Self {
        Self { sdb }
    }
}

#[async_trait]
impl EntityStore for SurrealStore {
    async fn create_entity(&self, data: CreateInboxEntity) -> Result<InboxEntity> {
        let entity = self
            .sdb
            .create::<Option<InboxEntity>>(INBOX_TABLE)
            .content(data)
            .await?
            .ok_or(Error::InternalServerError)?;
        Ok(entity)
    }

    async fn entity_by_id(&self, id: &RecordId) -> Result<Option<InboxEntity>> {
        let entity = self.sdb.select::<Option<InboxEntity>>(id.clone()).await?;
        Ok(entity)
    }

    async fn replace_entity(&self, entity: &InboxEntity) -> Result<InboxEntity> {
        let updated = self
            .sdb
            .update::<Option<InboxEntity>>(entity.id.clone())
            .content(entity.clone())
            .await?
            .ok_or(Error::InternalServerError)?;
        Ok(updated)
    }

    async fn delete_entity(&self, id: &RecordId) -> Result<()> {
        let _ = self.sdb.delete::<Option<InboxEntity>>(id.clone()).await?;
        Ok(())
    }

    async fn transition_entity_status(
        &self,
        id: &RecordId,
        status: EntityStatus,
    ) -> Result<Option<InboxEntity>> {
        // Single conditional update so only one of two racing resolutions
        // can advance the status.
        let updated = self
            .sdb
            .query(
                "UPDATE type::table($table) SET status = $status, updated_at = $updated_at WHERE id = $id AND status IN $allowed RETURN AFTER;",
            )
            .bind(("table", INBOX_TABLE))
            .bind(("status", status))
            .bind(("updated_at", time_now()))
            .bind(("id", id.clone()))
            .bind((
                "allowed",
                vec![EntityStatus::Draft, EntityStatus::Sent, EntityStatus::Pending],
            ))
            .await?
            .take::<Vec<InboxEntity>>(0)?;
        Ok(updated.into_iter().next())
    }

    async fn drafts_by_owner(&self, owner: &RecordId) -> Result<Vec<InboxEntity>> {
        let drafts = self
            .sdb
            .query(
                "SELECT * FROM type::table($table) WHERE from = $from AND status = $status ORDER BY created_at DESC;",
            )
            .bind(("table", INBOX_TABLE))
            .bind(("from", owner.clone()))
            .bind(("status", EntityStatus::Draft))
            .await?
            .take::<Vec<InboxEntity>>(0)?;
        Ok(drafts)
    }

    async fn sent_by_owner(&self, owner: &RecordId) -> Result<Vec<InboxEntity>> {
        let sent = self
            .sdb
            .query(
                "SELECT * FROM type::table($table) WHERE from = $from AND status IN $statuses ORDER BY created_at DESC;",
            )
            .bind(("table", INBOX_TABLE))
            .bind(("from", owner.clone()))
            .bind((
                "statuses",
                vec![
                    EntityStatus::Sent,
                    EntityStatus::Approved,
                    EntityStatus::Rejected,
                    EntityStatus::Pending,
                ],
            ))
            .await?
            .take::<Vec<InboxEntity>>(0)?;
        Ok(sent)
    }

    async fn arrivals_for(&self, recipient: &RecordId) -> Result<Vec<InboxEntity>> {
        let arrivals = self
            .sdb
            .query(
                "SELECT * FROM type::table($table) WHERE to CONTAINS $recipient ORDER BY created_at DESC;",
            )
            .bind(("table", INBOX_TABLE))
            .bind(("recipient", recipient.clone()))
            .await?
            .take::<Vec<InboxEntity>>(0)?;
        Ok(arrivals)
    }

    async fn pending_team_invite_exists(
        &self,
        team: &RecordId,
        recipient: &RecordId,
    ) -> Result<bool> {
        let existing = self
            .sdb
            .query(
                "SELECT * FROM type::table($table) WHERE type = $type AND status = $status AND related_team.id = $team AND to CONTAINS $recipient;",
            )
            .bind(("table", INBOX_TABLE))
            .bind(("type", EntityType::TeamInvite))
            .bind(("status", EntityStatus::Pending))
            .bind(("team", team.clone()))
            .bind(("recipient", recipient.clone()))
            .await?
            .take::<Vec<InboxEntity>>(0)?;
        Ok(!existing.is_empty())
    }

    async fn pending_subevent_invite_exists(
        &self,
        event: &RecordId,
        sub_event: &RecordId,
        recipient: &RecordId,
    ) -> Result<bool> {
        let existing = self
            .sdb
            .query(
                "SELECT * FROM type::table($table) WHERE type = $type AND status = $status AND related_event = $event AND meta.sub_event_id = $sub_event AND to CONTAINS $recipient;",
            )
            .bind(("table", INBOX_TABLE))
            .bind(("type", EntityType::SubeventInvite))
            .bind(("status", EntityStatus::Pending))
            .bind(("event", event.clone()))
            .bind(("sub_event", sub_event.clone()))
            .bind(("recipient", recipient.clone()))
            .await?
            .take::<Vec<InboxEntity>>(0)?;
        Ok(!existing.is_empty())
    }
}

#[async_trait]
impl UserStore for SurrealStore {
    async fn user_by_id(&self, id: &RecordId) -> Result<Option<User>> {
        let user = self.sdb.select::<Option<User>>(id.clone()).await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self
            .sdb
            .query("SELECT * FROM type::table($table) WHERE email = $email;")
            .bind(("table", USER_TABLE))
            .bind(("email", email.to_string()))
            .await?
            .take::<Vec<User>>(0)?;
        Ok(users.into_iter().next())
    }

    async fn user_by_email_role(&self, email: &str, role: UserRole) -> Result<Option<User>> {
        let users = self
            .sdb
            .query("SELECT * FROM type::table($table) WHERE email = $email AND role = $role;")
            .bind(("table", USER_TABLE))
            .bind(("email", email.to_string()))
            .bind(("role", role))
            .await?
            .take::<Vec<User>>(0)?;
        Ok(users.into_iter().next())
    }

    async fn users_all(&self) -> Result<Vec<User>> {
        let users = self
            .sdb
            .query("SELECT * FROM type::table($table);")
            .bind(("table", USER_TABLE))
            .await?
            .take::<Vec<User>>(0)?;
        Ok(users)
    }

    async fn users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        let users = self
            .sdb
            .query("SELECT * FROM type::table($table) WHERE role = $role;")
            .bind(("table", USER_TABLE))
            .bind(("role", role))
            .await?
            .take::<Vec<User>>(0)?;
        Ok(users)
    }

    async fn users_by_college(&self, college: &RecordId) -> Result<Vec<User>> {
        let users = self
            .sdb
            .query("SELECT * FROM type::table($table) WHERE college = $college;")
            .bind(("table", USER_TABLE))
            .bind(("college", college.clone()))
            .await?
            .take::<Vec<User>>(0)?;
        Ok(users)
    }
}

#[async_trait]
impl CollegeStore for SurrealStore {
    async fn college_by_name(&self, name: &str) -> Result<Option<College>> {
        let colleges = self
            .sdb
            .query("SELECT * FROM type::table($table) WHERE name = $name;")
            .bind(("table", COLLEGE_TABLE))
            .bind(("name", name.to_string()))
            .await?
            .take::<Vec<College>>(0)?;
        Ok(colleges.into_iter().next())
    }
}

#[async_trait]
impl TeamStore for SurrealStore {
    async fn organizer_team_by_id(&self, id: &RecordId) -> Result<Option<OrganizerTeam>> {
        let team = self.sdb.select::<Option<OrganizerTeam>>(id.clone()).await?;
        Ok(team)
    }

    async fn organizer_team_by_leader(&self, leader: &RecordId) -> Result<Option<OrganizerTeam>> {
        let teams = self
            .sdb
            .query("SELECT * FROM type::table($table) WHERE leader = $leader;")
            .bind(("table", ORGANIZER_TEAM_TABLE))
            .bind(("leader", leader.clone()))
            .await?
            .take::<Vec<OrganizerTeam>>(0)?;
        Ok(teams.into_iter().next())
    }

    async fn save_organizer_team(&self, team: &OrganizerTeam) -> Result<()> {
        let _ = self
            .sdb
            .update::<Option<OrganizerTeam>>(team.id.clone())
            .content(team.clone())
            .await?
            .ok_or(Error::InternalServerError)?;
        Ok(())
    }
}

#[async_trait]
impl StudentTeamStore for SurrealStore {
    async fn student_team_by_id(&self, id: &RecordId) -> Result<Option<StudentTeam>> {
        let team = self.sdb.select::<Option<StudentTeam>>(id.clone()).await?;
        Ok(team)
    }

    async fn save_student_team(&self, team: &StudentTeam) -> Result<()> {
        let _ = self
            .sdb
            .update::<Option<StudentTeam>>(team.id.clone())
            .content(team.clone())
            .await?
            .ok_or(Error::InternalServerError)?;
        Ok(())
    }
}

#[async_trait]
impl EventStore for SurrealStore {
    async fn event_by_id(&self, id: &RecordId) -> Result<Option<Event>> {
        let event = self.sdb.select::<Option<Event>>(id.clone()).await?;
        Ok(event)
    }

    async fn event_by_created_by(&self, team: &RecordId) -> Result<Option<Event>> {
        let events = self
            .sdb
            .query("SELECT * FROM type::table($table) WHERE created_by = $team;")
            .bind(("table", EVENT_TABLE))
            .bind(("team", team.clone()))
            .await?
            .take::<Vec<Event>>(0)?;
        Ok(events.into_iter().next())
    }

    async fn save_event(&self, event: &Event) -> Result<()> {
        let _ = self
            .sdb
            .update::<Option<Event>>(event.id.clone())
            .content(event.clone())
            .await?
            .ok_or(Error::InternalServerError)?;
        Ok(())
    }
}

#[async_trait]
impl RegistrationStore for SurrealStore {
    async fn registration_by_event_and_student(
        &self,
        event: &RecordId,
        student: &RecordId,
    ) -> Result<Option<Registration>> {
        let registrations = self
            .sdb
            .query(
                "SELECT * FROM type::table($table) WHERE event_id = $event AND student_id = $student;",
            )
            .bind(("table", REGISTRATION_TABLE))
            .bind(("event", event.clone()))
            .bind(("student", student.clone()))
            .await?
            .take::<Vec<Registration>>(0)?;
        Ok(registrations.into_iter().next())
    }

    async fn save_registration(&self, registration: &Registration) -> Result<()> {
        let _ = self
            .sdb
            .update::<Option<Registration>>(registration.id.clone())
            .content(registration.clone())
            .await?
            .ok_or(Error::InternalServerError)?;
        Ok(())
    }
}
