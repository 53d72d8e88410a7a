//! FFprobe-based media probing.

use super::types::*;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: String,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    color_primaries: Option<String>,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    creation_time: Option<String>,
}

/// Probe a media file using ffprobe found on `PATH`.
pub fn probe_with_ffprobe(path: &Path) -> Result<MediaInfo> {
    probe_with_ffprobe_at(Path::new("ffprobe"), path)
}

/// Probe a media file using the ffprobe executable at `ffprobe`.
pub fn probe_with_ffprobe_at(ffprobe: &Path, path: &Path) -> Result<MediaInfo> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Probing {:?} with {:?}", path, ffprobe);

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| Error::from_spawn("ffprobe", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::tool_failed("ffprobe", stderr.trim().to_string()));
    }

    let json_str = String::from_utf8(output.stdout)
        .map_err(|e| Error::parse_error("ffprobe", format!("Invalid UTF-8: {}", e)))?;

    parse_ffprobe_json(path, &json_str)
}

/// Parse the JSON emitted by `ffprobe -show_format -show_streams`.
pub fn parse_ffprobe_json(path: &Path, json: &str) -> Result<MediaInfo> {
    let ff_output: FfprobeOutput = serde_json::from_str(json)?;
    Ok(parse_ffprobe_output(path, ff_output))
}

fn parse_ffprobe_output(path: &Path, output: FfprobeOutput) -> MediaInfo {
    let video_tracks = output
        .streams
        .into_iter()
        .filter(|stream| stream.codec_type == "video")
        .map(|stream| VideoTrack {
            codec: stream.codec_name.unwrap_or_default(),
            color_primaries: stream.color_primaries.filter(|p| p != "unknown"),
            creation_time: stream.tags.creation_time,
        })
        .collect();

    MediaInfo {
        file_path: path.to_path_buf(),
        container: output.format.format_name,
        creation_time: output.format.tags.creation_time,
        video_tracks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_HLG: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "hevc",
                "profile": "Main 10",
                "codec_type": "video",
                "width": 3840,
                "height": 2160,
                "color_primaries": "bt2020",
                "r_frame_rate": "30/1",
                "tags": { "creation_time": "2021-03-04T10:15:00.000000Z", "language": "und" }
            },
            {
                "index": 1,
                "codec_name": "aac",
                "codec_type": "audio",
                "sample_rate": "44100",
                "channels": 2,
                "tags": { "creation_time": "2021-03-04T10:15:00.000000Z" }
            },
            {
                "index": 2,
                "codec_type": "data",
                "tags": { "handler_name": "Core Media Metadata" }
            }
        ],
        "format": {
            "filename": "IMG_0001.MOV",
            "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "12.345000",
            "size": "40000000",
            "tags": { "creation_time": "2021-03-04T10:15:00.000000Z" }
        }
    }"#;

    const NO_TAGS_AVI: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "mpeg4",
                "codec_type": "video",
                "width": 640,
                "height": 480,
                "r_frame_rate": "25/1"
            }
        ],
        "format": {
            "filename": "noMetadata.avi",
            "format_name": "avi",
            "duration": "3.000000",
            "size": "1000"
        }
    }"#;

    #[test]
    fn test_parse_tagged_file() {
        let info = parse_ffprobe_json(Path::new("IMG_0001.MOV"), IPHONE_HLG).unwrap();

        assert_eq!(info.container, "mov,mp4,m4a,3gp,3g2,mj2");
        assert_eq!(info.video_tracks.len(), 1);
        assert_eq!(info.video_tracks[0].codec, "hevc");
        assert_eq!(info.color_primaries(), Some("bt2020"));
        assert_eq!(info.creation_time(), Some("2021-03-04T10:15:00.000000Z"));
    }

    #[test]
    fn test_parse_untagged_file() {
        let info = parse_ffprobe_json(Path::new("noMetadata.avi"), NO_TAGS_AVI).unwrap();

        assert_eq!(info.container, "avi");
        assert_eq!(info.creation_time(), None);
        assert_eq!(info.color_primaries(), None);
        assert_eq!(info.video_tracks[0].codec, "mpeg4");
    }

    #[test]
    fn test_unknown_primaries_dropped() {
        let json = r#"{
            "streams": [{ "codec_type": "video", "codec_name": "h264", "color_primaries": "unknown" }],
            "format": { "format_name": "mov" }
        }"#;
        let info = parse_ffprobe_json(Path::new("a.mov"), json).unwrap();
        assert_eq!(info.color_primaries(), None);
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_ffprobe_json(Path::new("a.mov"), "not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = probe_with_ffprobe(Path::new("/nonexistent/clip.mov")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
