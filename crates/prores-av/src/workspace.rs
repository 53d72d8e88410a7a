//! Scratch space for a single transcode.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Prefix of workspace directories. The leading dot keeps them out of
/// discovery if a run is interrupted and one is left behind.
const WORKSPACE_PREFIX: &str = ".prores-work-";

/// Workspace for one transcode.
///
/// The temp directory lives inside the destination directory so that
/// finalizing is a same-filesystem rename. The directory and anything left
/// in it are removed on drop, whether or not the transcode succeeded.
///
/// # Example
///
/// ```no_run
/// use prores_av::Workspace;
/// use std::path::Path;
///
/// let workspace = Workspace::new_in("/card/clip.mp4", "/card/converted_videos", "mov")?;
/// // ffmpeg writes to workspace.output()
/// workspace.finalize(Path::new("/card/converted_videos/clip.mov"))?;
/// # Ok::<(), prores_av::Error>(())
/// ```
#[derive(Debug)]
pub struct Workspace {
    temp_dir: TempDir,
    input_path: PathBuf,
    output_path: PathBuf,
}

impl Workspace {
    /// Create a workspace under `parent` for converting `input` to a file
    /// with extension `extension`.
    pub fn new_in<P: AsRef<Path>, Q: AsRef<Path>>(
        input: P,
        parent: Q,
        extension: &str,
    ) -> Result<Self> {
        let input = input.as_ref();
        let temp_dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent.as_ref())
            .map_err(|e| Error::Workspace(e.to_string()))?;

        let file_stem = input
            .file_stem()
            .ok_or_else(|| Error::InvalidInput(format!("Invalid input file path: {:?}", input)))?;
        // Built by hand: with_extension would eat a dotted stem like "take.2".
        let mut file_name = file_stem.to_os_string();
        file_name.push(".");
        file_name.push(extension);
        let output_path = temp_dir.path().join(file_name);

        Ok(Self {
            temp_dir,
            input_path: input.to_path_buf(),
            output_path,
        })
    }

    /// Get the input file path.
    pub fn input(&self) -> &Path {
        &self.input_path
    }

    /// Get the path the transcoder should write to.
    pub fn output(&self) -> &Path {
        &self.output_path
    }

    /// Get the temp directory path.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Move the finished output to `dest`.
    ///
    /// An existing file at `dest` is replaced. It is first moved aside to a
    /// backup, which is restored if the final rename fails.
    pub fn finalize(self, dest: &Path) -> Result<PathBuf> {
        if !self.output_path.exists() {
            return Err(Error::Workspace(format!(
                "Output file does not exist: {:?}",
                self.output_path
            )));
        }

        if dest.exists() {
            let backup = self.temp_dir.path().join("replaced.bak");
            std::fs::rename(dest, &backup).map_err(|e| {
                Error::Workspace(format!("Failed to move aside existing file: {}", e))
            })?;

            if let Err(e) = std::fs::rename(&self.output_path, dest) {
                let _ = std::fs::rename(&backup, dest);
                return Err(Error::Workspace(format!(
                    "Failed to move output to destination: {}",
                    e
                )));
            }
        } else {
            std::fs::rename(&self.output_path, dest).map_err(|e| {
                Error::Workspace(format!("Failed to move output to destination: {}", e))
            })?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Finalized {:?} -> {:?}", self.input_path, dest);

        Ok(dest.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_workspace_paths() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::new_in("/card/GX010001.MP4", dir.path(), "mov").unwrap();

        assert_eq!(workspace.input(), Path::new("/card/GX010001.MP4"));
        assert!(workspace.temp_dir().starts_with(dir.path()));
        assert!(workspace.output().starts_with(workspace.temp_dir()));
        assert_eq!(workspace.output().file_name().unwrap(), "GX010001.mov");
    }

    #[test]
    fn test_workspace_dir_is_hidden() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::new_in("clip.mp4", dir.path(), "mov").unwrap();
        assert!(crate::paths::is_hidden(workspace.temp_dir()));
    }

    #[test]
    fn test_finalize_moves_output() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::new_in("clip.mp4", dir.path(), "mov").unwrap();
        std::fs::write(workspace.output(), b"prores").unwrap();
        let temp = workspace.temp_dir().to_path_buf();

        let dest = dir.path().join("2021-03-04_10-15-00.mov");
        let final_path = workspace.finalize(&dest).unwrap();

        assert_eq!(final_path, dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"prores");
        assert!(!temp.exists());
    }

    #[test]
    fn test_finalize_replaces_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("clip.mov");
        std::fs::write(&dest, b"old").unwrap();

        let workspace = Workspace::new_in("clip.mp4", dir.path(), "mov").unwrap();
        std::fs::write(workspace.output(), b"new").unwrap();
        workspace.finalize(&dest).unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn test_finalize_without_output_fails() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::new_in("clip.mp4", dir.path(), "mov").unwrap();
        let err = workspace.finalize(&dir.path().join("clip.mov")).unwrap_err();
        assert!(matches!(err, Error::Workspace(_)));
    }

    #[test]
    fn test_drop_removes_dir() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::new_in("clip.mp4", dir.path(), "mov").unwrap();
        std::fs::write(workspace.output(), b"partial").unwrap();
        let temp = workspace.temp_dir().to_path_buf();

        drop(workspace);
        assert!(!temp.exists());
    }
}
