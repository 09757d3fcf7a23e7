//! Story Media Library
//!
//! Local media handling for the story upload widget: preview handle
//! allocation/release and still-frame capture for the moderation pipeline.

pub mod ffmpeg;
pub mod preview;
pub mod still;

pub use ffmpeg::FfmpegStillExtractor;
pub use preview::{BlobPreviewAllocator, PreviewAllocator, PreviewHandle};
pub use still::{detect_image_media_type, EncodedStill, StillExtractor};
