use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Student,
    Organizer,
    Sponsor,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: RecordId,
    pub name: Option<String>,
    pub email: String, // ! unique & (len = 255)
    pub role: UserRole,
    pub college: Option<RecordId>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct College {
    pub id: RecordId,
    pub name: String, // ! unique
}
