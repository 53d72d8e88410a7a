//! Shared test harness for integration tests.
//!
//! Provides [`FakeEngine`], a [`MediaEngine`] that answers probes from a
//! table keyed by file name and "transcodes" by writing a marker file, while
//! recording every call.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use prores_av::{ColorProfile, Error, MediaInfo, VideoTrack, Workspace};
use prores_dater::MediaEngine;

/// Bytes the fake engine writes as transcoded output.
pub const FAKE_PRORES: &[u8] = b"fake prores 422 hq";

#[derive(Default)]
pub struct FakeEngine {
    creation_times: HashMap<String, String>,
    container_creation_times: HashMap<String, String>,
    primaries: HashMap<String, String>,
    rejected: HashSet<String>,
    pub transcoded: RefCell<Vec<PathBuf>>,
    pub colors: RefCell<Vec<ColorProfile>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `creation_time` for any file named `file_name`.
    pub fn with_creation_time(mut self, file_name: &str, value: &str) -> Self {
        self.creation_times
            .insert(file_name.to_string(), value.to_string());
        self
    }

    /// Report a container-level `creation_time` for any file named `file_name`.
    pub fn with_container_creation_time(mut self, file_name: &str, value: &str) -> Self {
        self.container_creation_times
            .insert(file_name.to_string(), value.to_string());
        self
    }

    /// Report `color_primaries` for any file named `file_name`.
    pub fn with_primaries(mut self, file_name: &str, value: &str) -> Self {
        self.primaries
            .insert(file_name.to_string(), value.to_string());
        self
    }

    /// Fail the transcode of any file named `file_name`.
    pub fn rejecting(mut self, file_name: &str) -> Self {
        self.rejected.insert(file_name.to_string());
        self
    }

    pub fn transcode_count(&self) -> usize {
        self.transcoded.borrow().len()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl MediaEngine for FakeEngine {
    fn probe(&self, path: &Path) -> prores_av::Result<MediaInfo> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        let name = file_name(path);

        Ok(MediaInfo {
            file_path: path.to_path_buf(),
            container: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
            creation_time: self.container_creation_times.get(&name).cloned(),
            video_tracks: vec![VideoTrack {
                codec: "h264".to_string(),
                color_primaries: self.primaries.get(&name).cloned(),
                creation_time: self.creation_times.get(&name).cloned(),
            }],
        })
    }

    fn transcode(&self, workspace: &Workspace, color: ColorProfile) -> prores_av::Result<()> {
        self.transcoded
            .borrow_mut()
            .push(workspace.input().to_path_buf());
        self.colors.borrow_mut().push(color);

        if self.rejected.contains(&file_name(workspace.input())) {
            return Err(Error::tool_failed(
                "ffmpeg",
                "Invalid data found when processing input",
            ));
        }

        fs::write(workspace.output(), FAKE_PRORES)?;
        Ok(())
    }
}

/// Create `path` (and its parents) with some placeholder bytes.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"source footage").unwrap();
}

/// Sorted file names directly inside `dir`.
pub fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
