use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Number of violation categories the endpoint reports on
pub const CATEGORY_COUNT: usize = 6;

/// Safe/unsafe judgment from the classification endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Safe,
    Unsafe,
}

impl Display for ModerationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ModerationStatus::Safe => write!(f, "safe"),
            ModerationStatus::Unsafe => write!(f, "unsafe"),
        }
    }
}

/// Per-category violation flags. Every field defaults to false when the
/// endpoint omits it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlaggedCategories {
    pub nudity: bool,
    pub profanity: bool,
    pub violence: bool,
    pub illegal_items: bool,
    pub contact_info: bool,
    pub off_topic: bool,
}

impl FlaggedCategories {
    /// Stable enumeration of all six categories with display names, in the
    /// order the presenter lists them.
    pub fn entries(&self) -> [(&'static str, bool); CATEGORY_COUNT] {
        [
            ("Nudity", self.nudity),
            ("Profanity", self.profanity),
            ("Violence", self.violence),
            ("Illegal items", self.illegal_items),
            ("Contact info", self.contact_info),
            ("Off-topic", self.off_topic),
        ]
    }

    pub fn any_flagged(&self) -> bool {
        self.entries().iter().any(|(_, flagged)| *flagged)
    }
}

fn default_confidence() -> f32 {
    0.9
}

fn default_content_type() -> String {
    "Unknown".to_string()
}

/// Structured judgment returned by the classification endpoint. Field names
/// match the wire JSON; every optional field carries its documented default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub moderation_status: ModerationStatus,
    #[serde(default)]
    pub moderation_reasons: Vec<String>,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub flagged_categories: FlaggedCategories,
}

impl Default for Verdict {
    fn default() -> Self {
        Self {
            moderation_status: ModerationStatus::Safe,
            moderation_reasons: Vec::new(),
            content_type: default_content_type(),
            tags: Vec::new(),
            confidence: default_confidence(),
            flagged_categories: FlaggedCategories::default(),
        }
    }
}

impl Verdict {
    pub fn is_safe(&self) -> bool {
        self.moderation_status == ModerationStatus::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_verdict_applies_defaults() {
        let verdict: Verdict = serde_json::from_str(r#"{"moderationStatus": "safe"}"#).unwrap();
        assert!(verdict.is_safe());
        assert!(verdict.moderation_reasons.is_empty());
        assert!(verdict.tags.is_empty());
        assert_eq!(verdict.content_type, "Unknown");
        assert!((verdict.confidence - 0.9).abs() < f32::EPSILON);
        assert!(!verdict.flagged_categories.any_flagged());
    }

    #[test]
    fn test_full_verdict_round_trip_fields() {
        let verdict: Verdict = serde_json::from_str(
            r#"{
                "moderationStatus": "unsafe",
                "moderationReasons": ["Contains contact information"],
                "contentType": "Haircut",
                "tags": ["fade", "barber"],
                "confidence": 0.97,
                "flaggedCategories": {
                    "nudity": false,
                    "profanity": false,
                    "violence": false,
                    "illegalItems": false,
                    "contactInfo": true,
                    "offTopic": false
                }
            }"#,
        )
        .unwrap();
        assert!(!verdict.is_safe());
        assert_eq!(verdict.moderation_reasons.len(), 1);
        assert_eq!(verdict.content_type, "Haircut");
        assert!(verdict.flagged_categories.contact_info);
        assert!(!verdict.flagged_categories.nudity);
    }

    #[test]
    fn test_partial_flags_default_false() {
        let verdict: Verdict = serde_json::from_str(
            r#"{"moderationStatus": "unsafe", "flaggedCategories": {"violence": true}}"#,
        )
        .unwrap();
        assert!(verdict.flagged_categories.violence);
        assert!(!verdict.flagged_categories.off_topic);
        assert!(verdict.flagged_categories.any_flagged());
    }

    #[test]
    fn test_missing_status_is_an_error() {
        assert!(serde_json::from_str::<Verdict>(r#"{"tags": []}"#).is_err());
    }

    #[test]
    fn test_category_entries_order_and_count() {
        let flags = FlaggedCategories {
            nudity: true,
            off_topic: true,
            ..Default::default()
        };
        let entries = flags.entries();
        assert_eq!(entries.len(), CATEGORY_COUNT);
        assert_eq!(entries[0], ("Nudity", true));
        assert_eq!(entries[5], ("Off-topic", true));
        assert_eq!(entries.iter().filter(|(_, f)| *f).count(), 2);
    }
}
