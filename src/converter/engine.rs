//! The media engine seam and its ffmpeg implementation.

use prores_av::actions::{transcode_to_prores, ColorProfile};
use prores_av::probe::probe_with_ffprobe_at;
use prores_av::{MediaInfo, Toolchain, Workspace};
use std::path::Path;

/// External engine that probes and transcodes media.
///
/// Both calls block until the work is done.
pub trait MediaEngine {
    /// Read container and stream metadata for `path`.
    fn probe(&self, path: &Path) -> prores_av::Result<MediaInfo>;

    /// Transcode `workspace.input()` to ProRes 422 HQ at `workspace.output()`.
    fn transcode(&self, workspace: &Workspace, color: ColorProfile) -> prores_av::Result<()>;
}

/// [`MediaEngine`] backed by the ffmpeg and ffprobe executables.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    tools: Toolchain,
}

impl FfmpegEngine {
    pub fn new(tools: Toolchain) -> Self {
        Self { tools }
    }
}

impl MediaEngine for FfmpegEngine {
    fn probe(&self, path: &Path) -> prores_av::Result<MediaInfo> {
        probe_with_ffprobe_at(&self.tools.ffprobe, path)
    }

    fn transcode(&self, workspace: &Workspace, color: ColorProfile) -> prores_av::Result<()> {
        transcode_to_prores(&self.tools.ffmpeg, workspace, color)
    }
}
