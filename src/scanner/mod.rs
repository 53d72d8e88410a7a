//! Input discovery.
//!
//! Expands the CLI path into the ordered list of files to convert. A file
//! argument is taken as-is; a directory is walked for video files.

use crate::error::{ConvertError, Result};
use prores_av::paths::{is_hidden, is_video_file_with};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Options controlling a directory walk.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Extensions accepted in addition to the built-in video list.
    pub extra_extensions: Vec<String>,
    /// Directory never descended into (the output directory).
    pub exclude: Option<PathBuf>,
}

/// Result of expanding an input path.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Files to convert, in processing order.
    pub videos: Vec<PathBuf>,
    /// Regular files skipped because they are not video.
    pub skipped: Vec<PathBuf>,
}

/// Expand `root` into the files to convert.
///
/// Directory results are ordered deepest first, then by path, so a run over
/// the same tree always visits files in the same order. Hidden files and
/// the excluded directory are never returned.
pub fn discover(root: &Path, options: &ScanOptions) -> Result<Discovery> {
    if !root.exists() {
        return Err(ConvertError::input_not_found(root));
    }

    if root.is_file() {
        return Ok(Discovery {
            videos: vec![root.to_path_buf()],
            skipped: Vec::new(),
        });
    }

    if !root.is_dir() {
        return Err(ConvertError::UnsupportedInput {
            path: root.to_path_buf(),
        });
    }

    let exclude = options
        .exclude
        .as_ref()
        .map(|p| p.canonicalize().unwrap_or_else(|_| p.clone()));
    let is_excluded = |path: &Path| match &exclude {
        Some(excluded) => path
            .canonicalize()
            .map(|p| &p == excluded)
            .unwrap_or(false),
        None => false,
    };

    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let mut discovery = Discovery::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        // The root itself reaches the predicate too and may be a dot-dir.
        .filter_entry(|e| {
            e.depth() == 0
                || (!is_hidden(e.path()) && !(e.file_type().is_dir() && is_excluded(e.path())))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        if is_video_file_with(&path, &options.extra_extensions) {
            discovery.videos.push(path);
        } else {
            debug!("Skipping non-video file: {:?}", path);
            discovery.skipped.push(path);
        }
    }

    discovery.videos.sort_by(|a, b| {
        let depth_a = a.components().count();
        let depth_b = b.components().count();
        depth_b.cmp(&depth_a).then_with(|| a.cmp(b))
    });

    debug!(
        "Discovered {} video files ({} skipped) under {:?}",
        discovery.videos.len(),
        discovery.skipped.len(),
        root
    );

    Ok(discovery)
}
