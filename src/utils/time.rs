use chrono::Local;

pub fn time_now() -> String {
    Local::now().to_rfc3339()
}
