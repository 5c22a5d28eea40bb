//! In-memory store used by the unit tests. Mirrors the SurrealDB store's
//! observable behavior, including the conditional status transition.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use async_trait::async_trait;
use surrealdb::RecordId;

use crate::consts::inbox_const::INBOX_TABLE;
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

#[derive(Default)]
struct Inner {
    entities: Vec<InboxEntity>,
    users: Vec<User>,
    colleges: Vec<College>,
    organizer_teams: Vec<OrganizerTeam>,
    student_teams: Vec<StudentTeam>,
    events: Vec<Event>,
    registrations: Vec<Registration>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    next_id: AtomicU64,
    fail_entity_creates: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `create_entity` fail, for exercising the
    /// best-effort notification path.
    pub fn fail_entity_creates(&self, fail: bool) {
        self.fail_entity_creates.store(fail, Ordering::SeqCst);
    }

    pub fn seed_user(&self, user: User) {
        self.inner.lock().unwrap().users.push(user);
    }

    pub fn seed_college(&self, college: College) {
        self.inner.lock().unwrap().colleges.push(college);
    }

    pub fn seed_organizer_team(&self, team: OrganizerTeam) {
        self.inner.lock().unwrap().organizer_teams.push(team);
    }

    pub fn seed_student_team(&self, team: StudentTeam) {
        self.inner.lock().unwrap().student_teams.push(team);
    }

    pub fn seed_event(&self, event: Event) {
        self.inner.lock().unwrap().events.push(event);
    }

    pub fn seed_registration(&self, registration: Registration) {
        self.inner.lock().unwrap().registrations.push(registration);
    }

    pub fn entity_count(&self) -> usize {
        self.inner.lock().unwrap().entities.len()
    }

    pub fn organizer_team_snapshot(&self, id: &RecordId) -> Option<OrganizerTeam> {
        self.inner
            .lock()
            .unwrap()
            .organizer_teams
            .iter()
            .find(|t| &t.id == id)
            .cloned()
    }

    pub fn student_team_snapshot(&self, id: &RecordId) -> Option<StudentTeam> {
        self.inner
            .lock()
            .unwrap()
            .student_teams
            .iter()
            .find(|t| &t.id == id)
            .cloned()
    }

    pub fn event_snapshot(&self, id: &RecordId) -> Option<Event> {
        self.inner
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|e| &e.id == id)
            .cloned()
    }

    pub fn registration_snapshot(&self, id: &RecordId) -> Option<Registration> {
        self.inner
            .lock()
            .unwrap()
            .registrations
            .iter()
            .find(|r| &r.id == id)
            .cloned()
    }

    pub fn entities_snapshot(&self) -> Vec<InboxEntity> {
        self.inner.lock().unwrap().entities.clone()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_entity(&self, data: CreateInboxEntity) -> Result<InboxEntity> {
        if self.fail_entity_creates.load(Ordering::SeqCst) {
            return Err(Error::InternalServerError);
        }
        let key = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entity = InboxEntity {
            id: RecordId::from_table_key(INBOX_TABLE, format!("{key}")),
            kind: data.kind,
            title: data.title,
            description: data.description,
            from: data.from,
            to: data.to,
            status: data.status,
            related_event: data.related_event,
            related_team: data.related_team,
            role: data.role,
            meta: data.meta,
            created_at: data.created_at,
            updated_at: None,
        };
        self.inner.lock().unwrap().entities.push(entity.clone());
        Ok(entity)
    }

    async fn entity_by_id(&self, id: &RecordId) -> Result<Option<InboxEntity>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .entities
            .iter()
            .find(|e| &e.id == id)
            .cloned())
    }

    async fn replace_entity(&self, entity: &InboxEntity) -> Result<InboxEntity> {
        let mut inner = self.inner.lock().unwrap();
        let slot = inner
            .entities
            .iter_mut()
            .find(|e| e.id == entity.id)
            .ok_or(Error::InternalServerError)?;
        *slot = entity.clone();
        Ok(entity.clone())
    }

    async fn delete_entity(&self, id: &RecordId) -> Result<()> {
        self.inner.lock().unwrap().entities.retain(|e| &e.id != id);
        Ok(())
    }

    async fn transition_entity_status(
        &self,
        id: &RecordId,
        status: EntityStatus,
    ) -> Result<Option<InboxEntity>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(slot) = inner.entities.iter_mut().find(|e| &e.id == id) else {
            return Ok(None);
        };
        if slot.status.is_terminal() {
            return Ok(None);
        }
        slot.status = status;
        slot.updated_at = Some(time_now());
        Ok(Some(slot.clone()))
    }

    async fn drafts_by_owner(&self, owner: &RecordId) -> Result<Vec<InboxEntity>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .entities
            .iter()
            .filter(|e| &e.from == owner && e.status == EntityStatus::Draft)
            .cloned()
            .collect())
    }

    async fn sent_by_owner(&self, owner: &RecordId) -> Result<Vec<InboxEntity>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .entities
            .iter()
            .filter(|e| &e.from == owner && e.status != EntityStatus::Draft)
            .cloned()
            .collect())
    }

    async fn arrivals_for(&self, recipient: &RecordId) -> Result<Vec<InboxEntity>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .entities
            .iter()
            .filter(|e| e.to.contains(recipient))
            .cloned()
            .collect())
    }

    async fn pending_team_invite_exists(
        &self,
        team: &RecordId,
        recipient: &RecordId,
    ) -> Result<bool> {
        Ok(self.inner.lock().unwrap().entities.iter().any(|e| {
            e.kind == EntityType::TeamInvite
                && e.status == EntityStatus::Pending
                && e.related_team.as_ref().is_some_and(|t| &t.id == team)
                && e.to.contains(recipient)
        }))
    }

    async fn pending_subevent_invite_exists(
        &self,
        event: &RecordId,
        sub_event: &RecordId,
        recipient: &RecordId,
    ) -> Result<bool> {
        Ok(self.inner.lock().unwrap().entities.iter().any(|e| {
            e.kind == EntityType::SubeventInvite
                && e.status == EntityStatus::Pending
                && e.related_event.as_ref() == Some(event)
                && e.meta
                    .as_ref()
                    .is_some_and(|m| m.sub_event_id.as_ref() == Some(sub_event))
                && e.to.contains(recipient)
        }))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn user_by_id(&self, id: &RecordId) -> Result<Option<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| &u.id == id)
            .cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn user_by_email_role(&self, email: &str, role: UserRole) -> Result<Option<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email && u.role == role)
            .cloned())
    }

    async fn users_all(&self) -> Result<Vec<User>> {
        Ok(self.inner.lock().unwrap().users.clone())
    }

    async fn users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn users_by_college(&self, college: &RecordId) -> Result<Vec<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .filter(|u| u.college.as_ref() == Some(college))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CollegeStore for MemoryStore {
    async fn college_by_name(&self, name: &str) -> Result<Option<College>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .colleges
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }
}

#[async_trait]
impl TeamStore for MemoryStore {
    async fn organizer_team_by_id(&self, id: &RecordId) -> Result<Option<OrganizerTeam>> {
        Ok(self.organizer_team_snapshot(id))
    }

    async fn organizer_team_by_leader(&self, leader: &RecordId) -> Result<Option<OrganizerTeam>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .organizer_teams
            .iter()
            .find(|t| &t.leader == leader)
            .cloned())
    }

    async fn save_organizer_team(&self, team: &OrganizerTeam) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let slot = inner
            .organizer_teams
            .iter_mut()
            .find(|t| t.id == team.id)
            .ok_or(Error::InternalServerError)?;
        *slot = team.clone();
        Ok(())
    }
}

#[async_trait]
impl StudentTeamStore for MemoryStore {
    async fn student_team_by_id(&self, id: &RecordId) -> Result<Option<StudentTeam>> {
        Ok(self.student_team_snapshot(id))
    }

    async fn save_student_team(&self, team: &StudentTeam) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let slot = inner
            .student_teams
            .iter_mut()
            .find(|t| t.id == team.id)
            .ok_or(Error::InternalServerError)?;
        *slot = team.clone();
        Ok(())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn event_by_id(&self, id: &RecordId) -> Result<Option<Event>> {
        Ok(self.event_snapshot(id))
    }

    async fn event_by_created_by(&self, team: &RecordId) -> Result<Option<Event>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|e| &e.created_by == team)
            .cloned())
    }

    async fn save_event(&self, event: &Event) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let slot = inner
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or(Error::InternalServerError)?;
        *slot = event.clone();
        Ok(())
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn registration_by_event_and_student(
        &self,
        event: &RecordId,
        student: &RecordId,
    ) -> Result<Option<Registration>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .registrations
            .iter()
            .find(|r| &r.event_id == event && &r.student_id == student)
            .cloned())
    }

    async fn save_registration(&self, registration: &Registration) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let slot = inner
            .registrations
            .iter_mut()
            .find(|r| r.id == registration.id)
            .ok_or(Error::InternalServerError)?;
        *slot = registration.clone();
        Ok(())
    }
}
