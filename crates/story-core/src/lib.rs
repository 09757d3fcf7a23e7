//! Story Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared across the story upload components.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{ModerationConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use error::StoryError;
pub use models::{
    FlaggedCategories, MediaFile, MediaKind, ModerationStatus, PreviewUrl, UploadRecord,
    UploadStatus, Verdict,
};
