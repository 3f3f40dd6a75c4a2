use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

/// A candidate file handed over by the UI (upload, paste, or drag) before
/// the image-type check has run.
#[derive(Clone, Debug, PartialEq)]
pub struct IncomingFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl IncomingFile {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// An accepted image staged for submission. The id is assigned by the
/// session and has no meaning outside it.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageAttachment {
    pub id: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// One analysis returned by the backend. `analysis_text` is raw Markdown,
/// rendered on demand and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub style: String,
    #[serde(rename = "analysis")]
    pub analysis_text: String,
}

/// A persisted past analysis session. The remote store owns these; the
/// session only ever holds a cached copy (see `SessionState::refresh_history`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub name: String,
    pub timestamp_millis: i64,
    #[serde(default)]
    pub user_context: String,
    #[serde(default)]
    pub analyses: Vec<AnalysisResult>,
}

impl HistoryRecord {
    /// Display form of the record timestamp, `YYYY-MM-DD HH:MM` in UTC.
    /// Empty string if the timestamp is out of range.
    pub fn formatted_time(&self) -> String {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
        OffsetDateTime::from_unix_timestamp(self.timestamp_millis / 1000)
            .ok()
            .and_then(|ts| ts.format(&format).ok())
            .unwrap_or_default()
    }
}

/// Everything one submit sends to the analysis service, captured as an
/// immutable snapshot before the call goes out. Later session mutations
/// never reach an in-flight payload.
#[derive(Clone, Debug)]
pub struct SubmissionPayload {
    pub attachments: Vec<ImageAttachment>,
    pub styles: Vec<String>,
    pub context: String,
    pub display_name: String,
}
