//! Media information types.

use std::path::PathBuf;

/// Information about a media file.
#[derive(Debug, Clone)]
pub struct MediaInfo {
    /// Path to the media file.
    pub file_path: PathBuf,
    /// Container format as ffprobe names it (e.g. "mov,mp4,m4a,3gp,3g2,mj2").
    pub container: String,
    /// Raw `creation_time` tag from the container, if any.
    pub creation_time: Option<String>,
    /// Video tracks in the file.
    pub video_tracks: Vec<VideoTrack>,
}

/// Information about a video track.
#[derive(Debug, Clone)]
pub struct VideoTrack {
    /// Video codec (e.g. "hevc", "h264", "prores").
    pub codec: String,
    /// Color primaries (e.g. "bt709", "bt2020").
    pub color_primaries: Option<String>,
    /// Raw `creation_time` tag on this stream, if any.
    pub creation_time: Option<String>,
}

impl MediaInfo {
    /// Get the primary (first) video track.
    pub fn primary_video(&self) -> Option<&VideoTrack> {
        self.video_tracks.first()
    }

    /// Color primaries of the primary video track.
    pub fn color_primaries(&self) -> Option<&str> {
        self.primary_video()
            .and_then(|v| v.color_primaries.as_deref())
    }

    /// The raw creation time tag.
    ///
    /// The first video stream's tag wins; the container tag is the fallback.
    /// Blank values count as absent.
    pub fn creation_time(&self) -> Option<&str> {
        self.primary_video()
            .and_then(|v| v.creation_time.as_deref())
            .and_then(nonblank)
            .or_else(|| self.creation_time.as_deref().and_then(nonblank))
    }
}

fn nonblank(s: &str) -> Option<&str> {
    Some(s.trim()).filter(|s| !s.is_empty())
}
