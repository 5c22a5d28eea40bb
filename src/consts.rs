pub mod inbox_const {
    pub const INBOX_TABLE: &str = "inbox_entities";
    pub const USER_TABLE: &str = "users";
    pub const COLLEGE_TABLE: &str = "colleges";
    pub const ORGANIZER_TEAM_TABLE: &str = "organizer_teams";
    pub const STUDENT_TEAM_TABLE: &str = "student_teams";
    pub const EVENT_TABLE: &str = "events";
    pub const REGISTRATION_TABLE: &str = "registrations";
}
