/// The current time.
pub fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}
