use serde::{Deserialize, Serialize};

/// One persisted row of aggregation history
///
/// Serialized verbatim in API responses; the field names are part of the
/// wire contract used by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Store-assigned identifier, increasing with insertion order
    pub id: i64,
    /// ISO-8601 timestamp of the snapshot
    pub timestamp: String,
    /// Running average importance of the text feature
    pub avg_text_importance: f64,
    /// Running average importance of the typing feature
    pub avg_typing_importance: f64,
    /// Running average importance of the voice feature
    pub avg_voice_importance: f64,
}

/// A snapshot that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewSnapshot {
    pub timestamp: String,
    pub avg_text_importance: f64,
    pub avg_typing_importance: f64,
    pub avg_voice_importance: f64,
}

impl NewSnapshot {
    /// Attach the id the store assigned on insert
    pub fn with_id(self, id: i64) -> DashboardSnapshot {
        DashboardSnapshot {
            id,
            timestamp: self.timestamp,
            avg_text_importance: self.avg_text_importance,
            avg_typing_importance: self.avg_typing_importance,
            avg_voice_importance: self.avg_voice_importance,
        }
    }
}

/// Rows inserted into an empty store at bootstrap: (timestamp, text, typing, voice)
pub const SEED_SNAPSHOTS: [(&str, f64, f64, f64); 3] = [
    ("2025-11-01T10:00:00Z", 0.4, 0.4, 0.2),
    ("2025-11-01T11:00:00Z", 0.42, 0.38, 0.2),
    ("2025-11-01T12:00:00Z", 0.38, 0.45, 0.17),
];
