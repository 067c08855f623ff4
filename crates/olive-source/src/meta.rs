/// Descriptive revision data used only for display.
///
/// Layout never depends on these fields, except the optional lineage colour
/// scheme which compares committers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevisionMeta {
    pub committer: String,
    pub message: String,
    /// Seconds since the epoch.
    pub timestamp: i64,
    /// Offset from UTC in seconds.
    pub timezone: i32,
}

impl RevisionMeta {
    pub fn new(committer: impl Into<String>, message: impl Into<String>, timestamp: i64) -> Self {
        Self {
            committer: committer.into(),
            message: message.into(),
            timestamp,
            timezone: 0,
        }
    }

    pub fn with_timezone(mut self, timezone: i32) -> Self {
        self.timezone = timezone;
        self
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}
