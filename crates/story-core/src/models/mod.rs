//! Data models for the story upload flow
//!
//! One upload record exists at a time; its verdict is set once by the
//! moderation pipeline and never mutated afterwards.

mod upload;
mod verdict;

pub use upload::{MediaFile, MediaKind, PreviewUrl, UploadRecord, UploadStatus};
pub use verdict::{FlaggedCategories, ModerationStatus, Verdict, CATEGORY_COUNT};
