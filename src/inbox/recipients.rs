//! Recipient resolution: turns the raw addressing payload of a draft or
//! send request into a concrete, deduplicated list of user ids.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::errors::{Error, Result};
use crate::inbox::Caller;
use crate::models::user::UserRole;
use crate::stores::InboxStores;

/// One element of the `to` payload: either an exact `{email, role}` lookup
/// or a bare broadcast directive string.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum RecipientSpec {
    Pair { email: String, role: UserRole },
    Directive(String),
}

enum Broadcast {
    AllUsers,
    AllOfRole(UserRole),
    College(String),
}

impl Broadcast {
    fn parse(raw: &str) -> Option<Broadcast> {
        match raw {
            "to_allusers" => Some(Broadcast::AllUsers),
            "to_all_student" => Some(Broadcast::AllOfRole(UserRole::Student)),
            "to_all_organizer" => Some(Broadcast::AllOfRole(UserRole::Organizer)),
            "to_all_sponsor" => Some(Broadcast::AllOfRole(UserRole::Sponsor)),
            _ => raw
                .strip_prefix("to_college:")
                .map(|name| Broadcast::College(name.trim().to_string())),
        }
    }
}

/// Resolves an addressing payload. Pairs with no matching user are dropped;
/// broadcast directives are admin-only and rejected before any lookup.
pub async fn resolve_recipients(
    store: &dyn InboxStores,
    caller: &Caller,
    specs: &[RecipientSpec],
) -> Result<Vec<RecordId>> {
    if specs.is_empty() {
        return Ok(Vec::new());
    }

    if let [RecipientSpec::Directive(raw)] = specs {
        let broadcast = Broadcast::parse(raw)
            .ok_or(Error::Validation("Unknown broadcast directive"))?;
        if caller.role != UserRole::Admin {
            return Err(Error::Forbidden("Broadcast addressing requires the admin role"));
        }
        let users = match broadcast {
            Broadcast::AllUsers => store.users_all().await?,
            Broadcast::AllOfRole(role) => store.users_by_role(role).await?,
            Broadcast::College(name) => {
                let college = store
                    .college_by_name(&name)
                    .await?
                    .ok_or(Error::NotFound("College"))?;
                store.users_by_college(&college.id).await?
            }
        };
        return Ok(dedup(users.into_iter().map(|u| u.id)));
    }

    let mut resolved = Vec::with_capacity(specs.len());
    for spec in specs {
        match spec {
            RecipientSpec::Pair { email, role } => {
                if let Some(user) = store.user_by_email_role(email, *role).await? {
                    resolved.push(user.id);
                }
            }
            RecipientSpec::Directive(_) => {
                return Err(Error::Validation(
                    "A broadcast directive cannot be combined with other recipients",
                ));
            }
        }
    }
    Ok(dedup(resolved.into_iter()))
}

fn dedup(ids: impl Iterator<Item = RecordId>) -> Vec<RecordId> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        if seen.insert(id.to_string()) {
            out.push(id);
        }
    }
    out
}
