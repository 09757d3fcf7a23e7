//! FFmpeg-backed still extraction for video uploads.
//!
//! Probes the clip with ffprobe, seeks to min(1 second, 10% of duration),
//! and captures one JPEG frame for classification.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use story_core::models::{MediaFile, MediaKind};
use story_core::StoryError;

use crate::still::{encode_image_still, EncodedStill, StillExtractor};

/// Validate that a tool path doesn't contain shell metacharacters or
/// dangerous sequences
fn validate_tool_path(path: &str) -> Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }

    if path.contains("..") {
        return Err(anyhow!("Path contains directory traversal: {}", path));
    }

    Ok(())
}

/// Seek target for the sampled frame: one second in, capped at 10% of the
/// clip for very short videos.
fn frame_timestamp(duration_seconds: f64) -> f64 {
    (duration_seconds * 0.10).min(1.0)
}

/// Captures one still frame from video input; image input passes through.
pub struct FfmpegStillExtractor {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegStillExtractor {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Result<Self> {
        validate_tool_path(&ffmpeg_path).context("Invalid ffmpeg_path")?;
        validate_tool_path(&ffprobe_path).context("Invalid ffprobe_path")?;

        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
        })
    }

    /// Default binaries resolved from PATH
    pub fn from_path() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }

    /// Probe the clip duration in seconds
    async fn probe_duration(&self, video_path: &Path) -> Result<f64> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(video_path)
            .output()
            .await
            .context("Failed to execute ffprobe")?;

        if !output.status.success() {
            return Err(anyhow!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        let probe_data: serde_json::Value =
            serde_json::from_slice(&output.stdout).context("Failed to parse ffprobe output")?;

        probe_data["format"]["duration"]
            .as_str()
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| anyhow!("Could not parse video duration"))
    }

    /// Decode one frame at the given timestamp to a JPEG file
    async fn extract_frame(
        &self,
        input_path: &Path,
        output_path: &Path,
        timestamp_seconds: f64,
    ) -> Result<()> {
        let args = vec![
            "-ss".to_string(),
            timestamp_seconds.to_string(),
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            "-vframes".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            "-y".to_string(),
            output_path.to_string_lossy().to_string(),
        ];

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            return Err(anyhow!(
                "ffmpeg frame extraction failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(())
    }

    async fn capture_video_frame(&self, file: &MediaFile) -> Result<EncodedStill> {
        let temp_dir = tempfile::TempDir::new().context("Failed to create temp directory")?;
        let input_path = temp_dir.path().join("input");
        let frame_path = temp_dir.path().join("frame.jpg");

        tokio::fs::write(&input_path, &file.data)
            .await
            .context("Failed to write video to temp file")?;

        let duration = self.probe_duration(&input_path).await?;
        let timestamp = frame_timestamp(duration);

        tracing::debug!(
            filename = %file.name,
            duration,
            timestamp,
            "Sampling video frame for moderation"
        );

        self.extract_frame(&input_path, &frame_path, timestamp)
            .await?;

        let frame_data = tokio::fs::read(&frame_path)
            .await
            .context("Failed to read extracted frame")?;

        let dimensions = image::load_from_memory(&frame_data)
            .ok()
            .map(|img| (img.width(), img.height()));

        Ok(EncodedStill {
            base64_data: STANDARD.encode(&frame_data),
            media_type: "image/jpeg".to_string(),
            from_video: true,
            width: dimensions.map(|(w, _)| w),
            height: dimensions.map(|(_, h)| h),
        })
    }
}

#[async_trait]
impl StillExtractor for FfmpegStillExtractor {
    async fn capture(&self, file: &MediaFile) -> Result<EncodedStill, StoryError> {
        match file.kind() {
            Some(MediaKind::Image) => Ok(encode_image_still(file)),
            Some(MediaKind::Video) => self
                .capture_video_frame(file)
                .await
                .map_err(|e| StoryError::MediaProcessing(e.to_string())),
            None => Err(StoryError::InvalidInput(format!(
                "Unsupported content type: {}",
                file.content_type
            ))),
        }
    }
}
