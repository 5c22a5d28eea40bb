use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationType {
    Individual,
    Team,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    PendingApproval,
    Verified,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Rejected,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Registration {
    pub id: RecordId,
    pub event_id: RecordId,
    pub student_id: RecordId,
    pub student_team_id: Option<RecordId>,
    pub registration_type: RegistrationType,
    pub payment_status: PaymentStatus,
    pub status: RegistrationStatus,
    pub check_in_code: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}
