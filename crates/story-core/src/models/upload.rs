use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

use super::verdict::Verdict;

/// Media kind enum, derived from the MIME type prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a MIME type; anything that is not `image/*` or `video/*`
    /// is not accepted by the widget.
    pub fn from_content_type(content_type: &str) -> Option<MediaKind> {
        let ct = content_type.trim().to_ascii_lowercase();
        if ct.starts_with("image/") {
            Some(MediaKind::Image)
        } else if ct.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// A user-chosen file as handed to the widget by the host
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_content_type(&self.content_type)
    }
}

/// Local preview reference for rendering the selected media before upload.
/// The string is display-only; the owning allocation is tracked separately
/// and must be released exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewUrl(pub String);

impl Display for PreviewUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an upload record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Analyzing,
    Approved,
    Rejected,
    Error,
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStatus::Analyzing => write!(f, "analyzing"),
            UploadStatus::Approved => write!(f, "approved"),
            UploadStatus::Rejected => write!(f, "rejected"),
            UploadStatus::Error => write!(f, "error"),
        }
    }
}

/// In-memory representation of one selected media item and its moderation
/// state. Created with `Analyzing`; transitions exactly once to a terminal
/// status when the remote call resolves.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub id: Uuid,
    pub file: MediaFile,
    pub kind: MediaKind,
    pub preview: PreviewUrl,
    pub status: UploadStatus,
    pub analysis: Option<Verdict>,
    pub error: Option<String>,
    pub selected_at: DateTime<Utc>,
}

impl UploadRecord {
    pub fn new(file: MediaFile, kind: MediaKind, preview: PreviewUrl) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            kind,
            preview,
            status: UploadStatus::Analyzing,
            analysis: None,
            error: None,
            selected_at: Utc::now(),
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.status == UploadStatus::Analyzing
    }

    /// Terminal transition carrying the verdict. The analysis result is set
    /// once and immutable thereafter.
    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.status = if verdict.is_safe() {
            UploadStatus::Approved
        } else {
            UploadStatus::Rejected
        };
        self.analysis = Some(verdict);
        self
    }

    /// Terminal transition for a failed pipeline run.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.status = UploadStatus::Error;
        self.error = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::verdict::{ModerationStatus, Verdict};

    fn test_file(content_type: &str) -> MediaFile {
        MediaFile::new("story.jpg", content_type, Bytes::from_static(b"\xFF\xD8\xFF"))
    }

    #[test]
    fn test_media_kind_classification() {
        assert_eq!(
            MediaKind::from_content_type("image/jpeg"),
            Some(MediaKind::Image)
        );
        assert_eq!(
            MediaKind::from_content_type("video/mp4"),
            Some(MediaKind::Video)
        );
        assert_eq!(MediaKind::from_content_type("application/pdf"), None);
        assert_eq!(MediaKind::from_content_type("text/plain"), None);
    }

    #[test]
    fn test_new_record_is_analyzing() {
        let record = UploadRecord::new(
            test_file("image/jpeg"),
            MediaKind::Image,
            PreviewUrl("blob:test".to_string()),
        );
        assert!(record.is_analyzing());
        assert!(record.analysis.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn test_safe_verdict_approves() {
        let record = UploadRecord::new(
            test_file("image/jpeg"),
            MediaKind::Image,
            PreviewUrl("blob:test".to_string()),
        );
        let record = record.with_verdict(Verdict {
            moderation_status: ModerationStatus::Safe,
            ..Verdict::default()
        });
        assert_eq!(record.status, UploadStatus::Approved);
        assert!(record.analysis.is_some());
    }

    #[test]
    fn test_unsafe_verdict_rejects() {
        let record = UploadRecord::new(
            test_file("image/jpeg"),
            MediaKind::Image,
            PreviewUrl("blob:test".to_string()),
        );
        let record = record.with_verdict(Verdict {
            moderation_status: ModerationStatus::Unsafe,
            ..Verdict::default()
        });
        assert_eq!(record.status, UploadStatus::Rejected);
    }

    #[test]
    fn test_error_transition_keeps_message() {
        let record = UploadRecord::new(
            test_file("video/mp4"),
            MediaKind::Video,
            PreviewUrl("blob:test".to_string()),
        );
        let record = record.with_error("analysis failed");
        assert_eq!(record.status, UploadStatus::Error);
        assert_eq!(record.error.as_deref(), Some("analysis failed"));
    }
}
