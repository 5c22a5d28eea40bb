//! The inbox engine: recipient resolution, draft management, the per-type
//! approval state machine, request-creation flows, and notification fan-out.
//! Handlers in `routes` stay thin and call into this module.

pub mod approval;
pub mod drafts;
pub mod notify;
pub mod recipients;
pub mod requests;

use surrealdb::RecordId;

use crate::errors::Result;
use crate::middleware::AuthUser;
use crate::models::user::UserRole;
use crate::utils::get_record_id::get_record_id_from_string;

/// Authenticated caller with its id already parsed to a record id.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: RecordId,
    pub role: UserRole,
}

impl Caller {
    pub fn from_auth(user: &AuthUser) -> Result<Caller> {
        Ok(Caller {
            id: get_record_id_from_string(&user.id)?,
            role: user.role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
