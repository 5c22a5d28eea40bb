//! Best-effort notification fan-out. A failed secondary notification must
//! never fail the primary operation, so errors are logged and swallowed
//! here; this is the one deliberate exception to the strict propagation
//! policy.

use surrealdb::RecordId;
use tracing::warn;

use crate::models::entity::{CreateInboxEntity, EntityStatus, EntityType};
use crate::stores::InboxStores;
use crate::utils::time::time_now;

pub struct Notification {
    pub kind: EntityType,
    pub from: RecordId,
    pub to: Vec<RecordId>,
    pub related_event: Option<RecordId>,
    pub title: String,
    pub description: String,
}

pub async fn notify(store: &dyn InboxStores, notification: Notification) {
    let status = if notification.kind.is_request() {
        EntityStatus::Pending
    } else {
        EntityStatus::Sent
    };

    let result = store
        .create_entity(CreateInboxEntity {
            kind: notification.kind,
            title: notification.title,
            description: Some(notification.description),
            from: notification.from,
            to: notification.to,
            status,
            related_event: notification.related_event,
            related_team: None,
            role: None,
            meta: None,
            created_at: time_now(),
        })
        .await;

    if let Err(err) = result {
        warn!("Failed to create inbox notification: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbox::test_support::*;
    use crate::models::entity::EntityStatus;
    use crate::models::user::UserRole;
    use crate::stores::memory::MemoryStore;

    #[tokio::test]
    async fn test_notify_creates_sent_message() {
        let store = MemoryStore::new();
        let admin = caller(UserRole::Admin, "admin");
        let target = caller(UserRole::Student, "target");

        notify(
            &store,
            Notification {
                kind: EntityType::Message,
                from: admin.id,
                to: vec![target.id.clone()],
                related_event: None,
                title: "Heads up".to_string(),
                description: "Something happened".to_string(),
            },
        )
        .await;

        let entities = store.entities_snapshot();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].status, EntityStatus::Sent);
        assert_eq!(entities[0].to, vec![target.id]);
    }

    #[tokio::test]
    async fn test_notify_swallows_store_failure() {
        let store = MemoryStore::new();
        store.fail_entity_creates(true);
        let admin = caller(UserRole::Admin, "admin");
        let target = caller(UserRole::Student, "target");

        notify(
            &store,
            Notification {
                kind: EntityType::Announcement,
                from: admin.id,
                to: vec![target.id],
                related_event: None,
                title: "Lost".to_string(),
                description: "Never lands".to_string(),
            },
        )
        .await;

        store.fail_entity_creates(false);
        assert_eq!(store.entity_count(), 0);
    }
}
