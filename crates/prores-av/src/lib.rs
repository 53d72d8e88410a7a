//! # prores-av
//!
//! ffmpeg and ffprobe plumbing for converting footage to ProRes 422 HQ.
//!
//! This crate provides functionality for:
//! - Locating ffmpeg/ffprobe and reporting their versions
//! - Probing media files for color primaries and `creation_time` tags
//! - Transcoding to ProRes 422 HQ inside a self-cleaning workspace
//! - Recognizing video files by extension
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use prores_av::probe;
//!
//! let info = probe("/card/IMG_0001.MOV")?;
//! println!("Container: {}", info.container);
//! if let Some(created) = info.creation_time() {
//!     println!("Created: {}", created);
//! }
//! # Ok::<(), prores_av::Error>(())
//! ```

mod error;
pub mod actions;
pub mod paths;
pub mod probe;
pub mod tools;
pub mod workspace;

// Re-exports
pub use actions::{transcode_to_prores, ColorProfile, PRORES_EXTENSION};
pub use error::{Error, Result};
pub use probe::{MediaInfo, VideoTrack};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo, Toolchain};
pub use workspace::Workspace;

/// Probe a media file and return its metadata.
///
/// Uses the ffprobe found on `PATH`. See [`probe::probe_with_ffprobe_at`] to
/// use a specific executable.
pub fn probe<P: AsRef<std::path::Path>>(path: P) -> Result<MediaInfo> {
    probe::probe(path.as_ref())
}
