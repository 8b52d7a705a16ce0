/// All wire timestamps carry an explicit numeric offset.
pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;

/// Current time in the engine's canonical (UTC, zero-offset) form.
pub fn now() -> Timestamp {
    chrono::Utc::now().fixed_offset()
}
