use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrganizerMember {
    pub user: RecordId,
    pub role: String, // ! (default volunteer) & (len = 50)
    pub status: MemberStatus,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrganizerTeam {
    pub id: RecordId,
    pub name: String, // ! unique & (len = 255)
    pub leader: RecordId,
    pub members: Vec<OrganizerMember>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StudentMember {
    pub member: RecordId,
    pub status: MemberStatus,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StudentTeam {
    pub id: RecordId,
    pub team_name: String, // ! unique
    pub leader: RecordId,
    pub members: Vec<StudentMember>,
    pub created_at: String,
    pub updated_at: Option<String>,
}
