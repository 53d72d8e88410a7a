//! Video file detection by extension.
//!
//! Discovery uses these checks to decide which directory entries get handed
//! to the transcoder. Anything not listed here is skipped.

use std::path::Path;

/// List of recognized video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "mts", "m2ts", "webm", "mov", "wmv", "flv", "mpg", "mpeg",
    "3gp", "mxf", "dv",
];

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use prores_av::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("clip.MOV")));
/// assert!(is_video_file(Path::new("/card/DCIM/100GOPRO/GX010001.MP4")));
/// assert!(!is_video_file(Path::new("notes.txt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    is_video_file_with(path, &[])
}

/// Check for a video extension, also accepting `extra` extensions.
///
/// Extras are compared case-insensitively and may carry a leading dot.
pub fn is_video_file_with(path: &Path, extra: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let ext = ext.to_lowercase();

    VIDEO_EXTENSIONS.contains(&ext.as_str())
        || extra
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

/// Whether the final path component starts with a dot.
///
/// Catches `.DS_Store` and the `._clip.mov` AppleDouble files that macOS
/// leaves on camera cards.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
