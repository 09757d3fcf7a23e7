//! Still capture for the moderation pipeline.
//!
//! Image input passes through unchanged; video input is sampled to one JPEG
//! frame by the ffmpeg extractor. Either way the result is a base64 payload
//! plus the declared media type for the inline image block.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

use story_core::models::MediaFile;
use story_core::StoryError;

/// Base64-encoded still image ready to send to the classification endpoint
#[derive(Debug, Clone)]
pub struct EncodedStill {
    pub base64_data: String,
    pub media_type: String,
    /// Whether this still was sampled from a video
    pub from_video: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Produces the still image sent for classification. One capture runs at a
/// time per widget; this step is never concurrent with itself.
#[async_trait]
pub trait StillExtractor: Send + Sync {
    async fn capture(&self, file: &MediaFile) -> Result<EncodedStill, StoryError>;
}

/// Detect media type from image data using magic numbers
pub fn detect_image_media_type(data: &[u8]) -> &'static str {
    if data.len() < 4 {
        return "image/jpeg"; // Default
    }

    // JPEG: FF D8 FF
    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return "image/jpeg";
    }

    // PNG: 89 50 4E 47
    if data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47 {
        return "image/png";
    }

    // GIF: 47 49 46
    if data[0] == 0x47 && data[1] == 0x49 && data[2] == 0x46 {
        return "image/gif";
    }

    // WebP: RIFF ... WEBP
    if data.len() >= 12
        && data[0] == 0x52
        && data[1] == 0x49
        && data[2] == 0x46
        && data[3] == 0x46
        && data[8] == 0x57
        && data[9] == 0x45
        && data[10] == 0x42
        && data[11] == 0x50
    {
        return "image/webp";
    }

    "image/jpeg" // Default
}

/// Encode an image file as-is for the inline image block. Dimensions are
/// probed opportunistically; an undecodable image still gets sent, the
/// endpoint is the authority on whether it can read it.
pub fn encode_image_still(file: &MediaFile) -> EncodedStill {
    let media_type = detect_image_media_type(&file.data);
    let dimensions = image::load_from_memory(&file.data)
        .ok()
        .map(|img| (img.width(), img.height()));

    EncodedStill {
        base64_data: STANDARD.encode(&file.data),
        media_type: media_type.to_string(),
        from_video: false,
        width: dimensions.map(|(w, _)| w),
        height: dimensions.map(|(_, h)| h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_detect_media_type_jpeg() {
        let jpeg_magic = vec![0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(detect_image_media_type(&jpeg_magic), "image/jpeg");
    }

    #[test]
    fn test_detect_media_type_png() {
        let png_magic = vec![0x89, 0x50, 0x4E, 0x47];
        assert_eq!(detect_image_media_type(&png_magic), "image/png");
    }

    #[test]
    fn test_detect_media_type_gif() {
        let gif_magic = vec![0x47, 0x49, 0x46, 0x38];
        assert_eq!(detect_image_media_type(&gif_magic), "image/gif");
    }

    #[test]
    fn test_detect_media_type_webp() {
        let webp_magic = vec![
            0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50,
        ];
        assert_eq!(detect_image_media_type(&webp_magic), "image/webp");
    }

    #[test]
    fn test_detect_media_type_unknown_defaults_jpeg() {
        assert_eq!(detect_image_media_type(&[0x00, 0x01]), "image/jpeg");
    }

    #[test]
    fn test_encode_image_passes_bytes_through() {
        let data = Bytes::from_static(b"\xFF\xD8\xFF\xE0 not a real jpeg");
        let file = MediaFile::new("a.jpg", "image/jpeg", data.clone());
        let still = encode_image_still(&file);
        assert_eq!(still.media_type, "image/jpeg");
        assert!(!still.from_video);
        assert_eq!(
            STANDARD.decode(&still.base64_data).unwrap(),
            data.as_ref()
        );
        // Undecodable payload: no dimensions, still encoded.
        assert!(still.width.is_none());
    }
}
