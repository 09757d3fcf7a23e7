//! Pure presentation of upload records.
//!
//! `render` is a function of record state only; the widget never stores view
//! state. Four renderings: analyzing, error, rejected, approved.

use story_core::models::{UploadRecord, UploadStatus, Verdict};

/// Fixed remediation instruction shown with a rejection
pub const REMEDIATION_INSTRUCTION: &str =
    "Remove this file and upload content that follows the story guidelines.";

/// One violation category with its display marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStatus {
    pub name: &'static str,
    pub flagged: bool,
}

impl CategoryStatus {
    /// "Flagged" or "Clear" marker for the panel
    pub fn marker(&self) -> &'static str {
        if self.flagged {
            "Flagged"
        } else {
            "Clear"
        }
    }
}

/// One of the four renderings of an upload record
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Progress indicator, no data
    Analyzing,
    /// Warning indicator with the captured failure message
    Error { message: String },
    /// Rejection reasons plus all six categories, flagged or clear
    Rejected {
        reasons: Vec<String>,
        categories: Vec<CategoryStatus>,
        remediation: &'static str,
    },
    /// Detected content type, tag chips, confidence, all six categories
    Approved {
        content_type: String,
        tags: Vec<String>,
        confidence_percent: u8,
        categories: Vec<CategoryStatus>,
    },
}

/// Rounded integer percentage for display (0.873 renders as 87)
pub fn confidence_percent(confidence: f32) -> u8 {
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}

/// All six categories in display order with their flags
fn category_statuses(verdict: Option<&Verdict>) -> Vec<CategoryStatus> {
    verdict
        .map(|v| {
            v.flagged_categories
                .entries()
                .into_iter()
                .map(|(name, flagged)| CategoryStatus { name, flagged })
                .collect()
        })
        .unwrap_or_default()
}

/// Pure function of record state to its rendering
pub fn render(record: &UploadRecord) -> ViewState {
    match record.status {
        UploadStatus::Analyzing => ViewState::Analyzing,
        UploadStatus::Error => ViewState::Error {
            message: record
                .error
                .clone()
                .unwrap_or_else(|| "Analysis failed".to_string()),
        },
        UploadStatus::Rejected => {
            let verdict = record.analysis.as_ref();
            let reasons = verdict
                .map(|v| v.moderation_reasons.clone())
                .unwrap_or_default();
            ViewState::Rejected {
                reasons,
                categories: category_statuses(verdict),
                remediation: REMEDIATION_INSTRUCTION,
            }
        }
        UploadStatus::Approved => {
            let verdict = record.analysis.as_ref();
            ViewState::Approved {
                content_type: verdict
                    .map(|v| v.content_type.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                tags: verdict.map(|v| v.tags.clone()).unwrap_or_default(),
                confidence_percent: confidence_percent(
                    verdict.map(|v| v.confidence).unwrap_or(0.0),
                ),
                categories: category_statuses(verdict),
            }
        }
    }
}

/// Publish is enabled only when at least one record is approved and none are
/// still analyzing.
pub fn publish_enabled(records: &[UploadRecord]) -> bool {
    let any_approved = records
        .iter()
        .any(|r| r.status == UploadStatus::Approved);
    let any_analyzing = records.iter().any(|r| r.is_analyzing());
    any_approved && !any_analyzing
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use story_core::models::{
        FlaggedCategories, MediaFile, MediaKind, ModerationStatus, PreviewUrl, Verdict,
    };

    fn record() -> UploadRecord {
        UploadRecord::new(
            MediaFile::new("a.jpg", "image/jpeg", Bytes::from_static(b"\xFF\xD8\xFF")),
            MediaKind::Image,
            PreviewUrl("blob:test".to_string()),
        )
    }

    #[test]
    fn test_confidence_percent_rounding() {
        assert_eq!(confidence_percent(0.873), 87);
        assert_eq!(confidence_percent(0.875), 88);
        assert_eq!(confidence_percent(0.0), 0);
        assert_eq!(confidence_percent(1.0), 100);
    }

    #[test]
    fn test_analyzing_renders_progress() {
        assert_eq!(render(&record()), ViewState::Analyzing);
    }

    #[test]
    fn test_error_renders_message() {
        let rec = record().with_error("endpoint unreachable");
        assert_eq!(
            render(&rec),
            ViewState::Error {
                message: "endpoint unreachable".to_string()
            }
        );
    }

    #[test]
    fn test_rejected_enumerates_all_six_categories() {
        let rec = record().with_verdict(Verdict {
            moderation_status: ModerationStatus::Unsafe,
            moderation_reasons: vec!["Contains a phone number".to_string()],
            flagged_categories: FlaggedCategories {
                contact_info: true,
                off_topic: true,
                ..Default::default()
            },
            ..Default::default()
        });

        match render(&rec) {
            ViewState::Rejected {
                reasons,
                categories,
                remediation,
            } => {
                assert_eq!(reasons.len(), 1);
                assert_eq!(remediation, REMEDIATION_INSTRUCTION);
                assert_eq!(categories.len(), 6);
                let flagged: Vec<&str> = categories
                    .iter()
                    .filter(|c| c.flagged)
                    .map(|c| c.name)
                    .collect();
                assert_eq!(flagged, vec!["Contact info", "Off-topic"]);
                // The other four categories are listed as clear, not omitted.
                let clear: Vec<&str> = categories
                    .iter()
                    .filter(|c| c.marker() == "Clear")
                    .map(|c| c.name)
                    .collect();
                assert_eq!(
                    clear,
                    vec!["Nudity", "Profanity", "Violence", "Illegal items"]
                );
            }
            other => panic!("expected rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_approved_enumerates_all_six_categories() {
        let rec = record().with_verdict(Verdict {
            moderation_status: ModerationStatus::Safe,
            content_type: "Manicure".to_string(),
            tags: vec!["gel".to_string(), "nails".to_string()],
            confidence: 0.873,
            ..Default::default()
        });

        match render(&rec) {
            ViewState::Approved {
                content_type,
                tags,
                confidence_percent,
                categories,
            } => {
                assert_eq!(content_type, "Manicure");
                assert_eq!(tags.len(), 2);
                assert_eq!(confidence_percent, 87);
                assert_eq!(categories.len(), 6);
                assert!(categories.iter().all(|c| c.marker() == "Clear"));
            }
            other => panic!("expected approved, got {:?}", other),
        }
    }

    #[test]
    fn test_publish_gating() {
        // Empty: disabled.
        assert!(!publish_enabled(&[]));

        // Analyzing only: disabled.
        assert!(!publish_enabled(&[record()]));

        // Approved: enabled.
        let approved = record().with_verdict(Verdict::default());
        assert!(publish_enabled(std::slice::from_ref(&approved)));

        // Approved plus analyzing: disabled.
        assert!(!publish_enabled(&[approved.clone(), record()]));

        // Rejected only: disabled.
        let rejected = record().with_verdict(Verdict {
            moderation_status: ModerationStatus::Unsafe,
            ..Default::default()
        });
        assert!(!publish_enabled(&[rejected]));
    }
}
