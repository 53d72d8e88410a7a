//! Media file probing module.
//!
//! Probing shells out to ffprobe and parses its JSON output. Only the fields
//! the converter needs are kept: container, video streams, color
//! primaries and the `creation_time` tags.

mod ffprobe;
mod types;

pub use ffprobe::{parse_ffprobe_json, probe_with_ffprobe, probe_with_ffprobe_at};
pub use types::*;

use crate::Result;
use std::path::Path;

/// Probe a media file with the ffprobe found on `PATH`.
pub fn probe(path: &Path) -> Result<MediaInfo> {
    probe_with_ffprobe(path)
}
