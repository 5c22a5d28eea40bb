//! Draft lifecycle and direct sends: create/edit/delete drafts, promote a
//! draft to `Sent`, and the list queries behind the inbox views. Ownership
//! and draft-state guards live here, not in the handlers.

use surrealdb::RecordId;

use crate::errors::{Error, Result};
use crate::inbox::Caller;
use crate::inbox::recipients::{RecipientSpec, resolve_recipients};
use crate::models::entity::{
    CreateInboxEntity, EntityMeta, EntityStatus, EntityType, InboxEntity, TeamRef,
};
use crate::stores::InboxStores;
use crate::utils::time::time_now;

#[derive(Debug, Clone)]
pub struct DraftPayload {
    pub kind: EntityType,
    pub title: String,
    pub description: Option<String>,
    pub to: Vec<RecipientSpec>,
    pub related_event: Option<RecordId>,
    pub related_team: Option<TeamRef>,
    pub role: Option<String>,
    pub meta: Option<EntityMeta>,
}

#[derive(Debug, Clone, Default)]
pub struct DraftPatch {
    pub kind: Option<EntityType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub to: Option<Vec<RecipientSpec>>,
    pub related_event: Option<RecordId>,
    pub related_team: Option<TeamRef>,
    pub role: Option<String>,
}

fn check_payload(payload: &DraftPayload) -> Result<()> {
    if payload.title.trim().is_empty() {
        return Err(Error::Validation("Type and title are required"));
    }
    if payload.kind.requires_related_team() && payload.related_team.is_none() {
        return Err(Error::Validation("A related team is required for this type"));
    }
    if payload.kind.requires_related_event() && payload.related_event.is_none() {
        return Err(Error::Validation("A related event is required for this type"));
    }
    Ok(())
}

pub async fn create_draft(
    store: &dyn InboxStores,
    caller: &Caller,
    payload: DraftPayload,
) -> Result<InboxEntity> {
    check_payload(&payload)?;
    let to = resolve_recipients(store, caller, &payload.to).await?;

    store
        .create_entity(CreateInboxEntity {
            kind: payload.kind,
            title: payload.title,
            description: payload.description,
            from: caller.id.clone(),
            to,
            status: EntityStatus::Draft,
            related_event: payload.related_event,
            related_team: payload.related_team,
            role: payload.role,
            meta: payload.meta,
            created_at: time_now(),
        })
        .await
}

pub async fn edit_draft(
    store: &dyn InboxStores,
    caller: &Caller,
    id: &RecordId,
    patch: DraftPatch,
) -> Result<InboxEntity> {
    let mut draft = store
        .entity_by_id(id)
        .await?
        .ok_or(Error::NotFound("Draft"))?;

    if draft.from != caller.id {
        return Err(Error::Forbidden("Unauthorized to edit this draft"));
    }
    if draft.status != EntityStatus::Draft {
        return Err(Error::InvalidState("Only drafts can be edited"));
    }

    if let Some(kind) = patch.kind {
        draft.kind = kind;
    }
    if let Some(title) = patch.title {
        if title.trim().is_empty() {
            return Err(Error::Validation("Type and title are required"));
        }
        draft.title = title;
    }
    if let Some(description) = patch.description {
        draft.description = Some(description);
    }
    if let Some(related_event) = patch.related_event {
        draft.related_event = Some(related_event);
    }
    if let Some(related_team) = patch.related_team {
        draft.related_team = Some(related_team);
    }
    if let Some(role) = patch.role {
        draft.role = Some(role);
    }
    // An omitted or empty `to` keeps the existing recipients; a non-empty
    // one is re-resolved and replaces them.
    if let Some(specs) = patch.to {
        if !specs.is_empty() {
            draft.to = resolve_recipients(store, caller, &specs).await?;
        }
    }
    draft.updated_at = Some(time_now());

    store.replace_entity(&draft).await
}

pub async fn delete_draft(store: &dyn InboxStores, caller: &Caller, id: &RecordId) -> Result<()> {
    let draft = store
        .entity_by_id(id)
        .await?
        .ok_or(Error::NotFound("Draft"))?;

    if draft.from != caller.id {
        return Err(Error::Forbidden("Unauthorized"));
    }
    if draft.status != EntityStatus::Draft {
        return Err(Error::InvalidState("Only drafts can be deleted"));
    }

    store.delete_entity(id).await
}

/// Promotes a draft to `Sent`. An optional list of already-resolved
/// recipient ids may replace the stored list.
pub async fn send_draft(
    store: &dyn InboxStores,
    caller: &Caller,
    id: &RecordId,
    to_override: Option<Vec<RecordId>>,
) -> Result<InboxEntity> {
    let mut draft = store
        .entity_by_id(id)
        .await?
        .ok_or(Error::NotFound("Message"))?;

    if draft.from != caller.id {
        return Err(Error::Forbidden("Unauthorized"));
    }
    if draft.status != EntityStatus::Draft {
        return Err(Error::InvalidState("Only drafts can be sent"));
    }

    if let Some(to) = to_override {
        if !to.is_empty() {
            draft.to = to;
        }
    }
    if draft.to.is_empty() {
        return Err(Error::Validation("Recipients are required"));
    }

    draft.status = EntityStatus::Sent;
    draft.updated_at = Some(time_now());
    store.replace_entity(&draft).await
}

/// Creates a directly-sent entity, skipping the draft state. Request-bearing
/// kinds enter the approval lifecycle as `Pending`; plain messages are
/// `Sent`.
pub async fn send_direct(
    store: &dyn InboxStores,
    caller: &Caller,
    payload: DraftPayload,
) -> Result<InboxEntity> {
    check_payload(&payload)?;
    let to = resolve_recipients(store, caller, &payload.to).await?;
    if to.is_empty() {
        return Err(Error::Validation("Recipients required"));
    }

    let status = if payload.kind.is_request() {
        EntityStatus::Pending
    } else {
        EntityStatus::Sent
    };

    store
        .create_entity(CreateInboxEntity {
            kind: payload.kind,
            title: payload.title,
            description: payload.description,
            from: caller.id.clone(),
            to,
            status,
            related_event: payload.related_event,
            related_team: payload.related_team,
            role: payload.role,
            meta: payload.meta,
            created_at: time_now(),
        })
        .await
}

pub async fn list_drafts(store: &dyn InboxStores, caller: &Caller) -> Result<Vec<InboxEntity>> {
    store.drafts_by_owner(&caller.id).await
}

pub async fn list_sent(store: &dyn InboxStores, caller: &Caller) -> Result<Vec<InboxEntity>> {
    store.sent_by_owner(&caller.id).await
}

pub async fn list_arrivals(store: &dyn InboxStores, caller: &Caller) -> Result<Vec<InboxEntity>> {
    store.arrivals_for(&caller.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbox::test_support::*;
    use crate::models::user::UserRole;
    use crate::stores::memory::MemoryStore;

    fn message_payload(title: &str, to: Vec<RecipientSpec>) -> DraftPayload {
        DraftPayload {
            kind: EntityType::Message,
            title: title.to_string(),
            description: Some("hello".to_string()),
            to,
            related_event: None,
            related_team: None,
            role: None,
            meta: None,
        }
    }

    fn pair(email: &str, role: UserRole) -> RecipientSpec {
        RecipientSpec::Pair {
            email: email.to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_edit_send_roundtrip_keeps_edited_title() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice", UserRole::Student);
        let sender = caller(UserRole::Student, "sender");

        let draft = create_draft(
            &store,
            &sender,
            message_payload("Original", vec![pair("alice@campus.test", UserRole::Student)]),
        )
        .await
        .unwrap();
        assert_eq!(draft.status, EntityStatus::Draft);
        assert_eq!(draft.to, vec![alice.id.clone()]);

        let edited = edit_draft(
            &store,
            &sender,
            &draft.id,
            DraftPatch {
                title: Some("Edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(edited.title, "Edited");

        let sent = send_draft(&store, &sender, &draft.id, None).await.unwrap();
        assert_eq!(sent.status, EntityStatus::Sent);
        assert_eq!(sent.title, "Edited");
        assert_eq!(sent.to, vec![alice.id]);
    }

    #[tokio::test]
    async fn test_edit_by_non_owner_is_forbidden() {
        let store = MemoryStore::new();
        let sender = caller(UserRole::Student, "sender");
        let other = caller(UserRole::Student, "other");

        let draft = create_draft(&store, &sender, message_payload("Draft", vec![]))
            .await
            .unwrap();

        let err = edit_draft(
            &store,
            &other,
            &draft.id,
            DraftPatch {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_edit_after_send_is_rejected() {
        let store = MemoryStore::new();
        let _alice = seed_user(&store, "alice", UserRole::Student);
        let sender = caller(UserRole::Student, "sender");

        let draft = create_draft(
            &store,
            &sender,
            message_payload("Draft", vec![pair("alice@campus.test", UserRole::Student)]),
        )
        .await
        .unwrap();
        send_draft(&store, &sender, &draft.id, None).await.unwrap();

        let err = edit_draft(
            &store,
            &sender,
            &draft.id,
            DraftPatch {
                title: Some("Too late".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_edit_with_empty_to_keeps_recipients() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice", UserRole::Student);
        let sender = caller(UserRole::Student, "sender");

        let draft = create_draft(
            &store,
            &sender,
            message_payload("Draft", vec![pair("alice@campus.test", UserRole::Student)]),
        )
        .await
        .unwrap();

        let edited = edit_draft(
            &store,
            &sender,
            &draft.id,
            DraftPatch {
                to: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(edited.to, vec![alice.id]);
    }

    #[tokio::test]
    async fn test_send_without_recipients_is_rejected() {
        let store = MemoryStore::new();
        let sender = caller(UserRole::Student, "sender");

        let draft = create_draft(&store, &sender, message_payload("Draft", vec![]))
            .await
            .unwrap();

        let err = send_draft(&store, &sender, &draft.id, None).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_draft_enforces_owner_and_state() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice", UserRole::Student);
        let sender = caller(UserRole::Student, "sender");
        let other = caller(UserRole::Student, "other");

        let draft = create_draft(
            &store,
            &sender,
            message_payload("Draft", vec![pair("alice@campus.test", UserRole::Student)]),
        )
        .await
        .unwrap();

        let err = delete_draft(&store, &other, &draft.id).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));

        send_draft(&store, &sender, &draft.id, None).await.unwrap();
        let err = delete_draft(&store, &sender, &draft.id).await.unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_delete_draft_removes_it() {
        let store = MemoryStore::new();
        let sender = caller(UserRole::Student, "sender");

        let draft = create_draft(&store, &sender, message_payload("Draft", vec![]))
            .await
            .unwrap();
        delete_draft(&store, &sender, &draft.id).await.unwrap();

        assert_eq!(store.entity_count(), 0);
    }

    #[tokio::test]
    async fn test_send_direct_requires_recipients() {
        let store = MemoryStore::new();
        let sender = caller(UserRole::Student, "sender");

        let err = send_direct(
            &store,
            &sender,
            message_payload("Hello", vec![pair("ghost@campus.test", UserRole::Student)]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.entity_count(), 0);
    }

    #[tokio::test]
    async fn test_send_direct_broadcast_by_non_admin_creates_nothing() {
        let store = MemoryStore::new();
        let _alice = seed_user(&store, "alice", UserRole::Student);
        let sender = caller(UserRole::Student, "sender");

        let err = send_direct(
            &store,
            &sender,
            message_payload(
                "Hello",
                vec![RecipientSpec::Directive("to_allusers".to_string())],
            ),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Forbidden(_)));
        assert_eq!(store.entity_count(), 0);
    }

    #[tokio::test]
    async fn test_lists_split_by_owner_and_status() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice", UserRole::Student);
        let sender = caller(UserRole::Student, "sender");
        let recipient = Caller {
            id: alice.id.clone(),
            role: UserRole::Student,
        };

        let draft = create_draft(&store, &sender, message_payload("Kept draft", vec![]))
            .await
            .unwrap();
        let sent = create_draft(
            &store,
            &sender,
            message_payload("Sent one", vec![pair("alice@campus.test", UserRole::Student)]),
        )
        .await
        .unwrap();
        send_draft(&store, &sender, &sent.id, None).await.unwrap();

        let drafts = list_drafts(&store, &sender).await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, draft.id);

        let sents = list_sent(&store, &sender).await.unwrap();
        assert_eq!(sents.len(), 1);
        assert_eq!(sents[0].id, sent.id);

        let arrivals = list_arrivals(&store, &recipient).await.unwrap();
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].id, sent.id);
    }
}
