//! The convert-and-rename loop.
//!
//! For each discovered file: probe it, transcode it into a workspace inside
//! the output directory, work out its creation date and move the result to
//! its final name. Files are handled one at a time; a failure is logged and
//! recorded and the loop moves on to the next file.

mod engine;

pub use engine::{FfmpegEngine, MediaEngine};

use crate::config::{CollisionPolicy, Config};
use crate::error::{ConvertError, Result};
use crate::naming::{parse_creation_time, resolve_collision, Namer};
use crate::scanner::{discover, ScanOptions};
use chrono::NaiveDateTime;
use prores_av::{ColorProfile, MediaInfo, Workspace, PRORES_EXTENSION};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Result of converting (or planning) one file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub created: Option<NaiveDateTime>,
    pub color: ColorProfile,
}

/// A file that could not be converted.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub source: PathBuf,
    pub message: String,
}

/// Aggregate result of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub converted: Vec<FileOutcome>,
    pub failed: Vec<FileFailure>,
    pub skipped: Vec<PathBuf>,
    pub dry_run: bool,
}

impl RunSummary {
    /// Whether every discovered file converted.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Converted files that were named after their creation date.
    pub fn dated(&self) -> usize {
        self.converted.iter().filter(|o| o.created.is_some()).count()
    }
}

/// Converts files to ProRes 422 HQ and names them by creation date.
pub struct Converter<E: MediaEngine> {
    engine: E,
    config: Config,
    namer: Namer,
    dry_run: bool,
    claimed: HashSet<PathBuf>,
    sources: HashSet<PathBuf>,
}

impl<E: MediaEngine> Converter<E> {
    pub fn new(engine: E, config: Config) -> Self {
        let namer = Namer::new(&config.naming);
        Self {
            engine,
            config,
            namer,
            dry_run: false,
            claimed: HashSet::new(),
            sources: HashSet::new(),
        }
    }

    /// Plan names without transcoding or touching the filesystem.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Where outputs for `input` are written.
    ///
    /// An explicit `output.dir` wins. Otherwise `output.dir_name` is placed
    /// inside a directory input, or next to a file input.
    pub fn output_dir_for(&self, input: &Path) -> PathBuf {
        if let Some(dir) = &self.config.output.dir {
            return dir.clone();
        }
        if input.is_dir() {
            input.join(&self.config.output.dir_name)
        } else {
            input
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(&self.config.output.dir_name)
        }
    }

    /// Convert a file, or every video file under a directory.
    ///
    /// Only a missing or unusable input path is an error here; per-file
    /// failures are collected in the returned summary.
    pub fn process(&mut self, path: &Path) -> Result<RunSummary> {
        let output_dir = self.output_dir_for(path);
        let options = ScanOptions {
            recursive: self.config.scan.recursive,
            extra_extensions: self.config.scan.extra_extensions.clone(),
            exclude: Some(output_dir.clone()),
        };
        let discovery = discover(path, &options)?;
        self.sources = discovery.videos.iter().map(|p| path_key(p)).collect();

        let mut summary = RunSummary {
            output_dir: output_dir.clone(),
            skipped: discovery.skipped,
            dry_run: self.dry_run,
            ..RunSummary::default()
        };

        if discovery.videos.is_empty() {
            warn!("No video files found under {:?}", path);
            return Ok(summary);
        }

        if !self.dry_run {
            std::fs::create_dir_all(&output_dir)?;
        }

        let total = discovery.videos.len();
        for (i, file) in discovery.videos.iter().enumerate() {
            info!("[{}/{}] {:?}", i + 1, total, file);

            match self.convert_file(file, &output_dir) {
                Ok(outcome) => summary.converted.push(outcome),
                Err(e) => {
                    error!("Failed to convert {:?}: {}", file, e);
                    summary.failed.push(FileFailure {
                        source: file.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Done: {} converted ({} dated), {} failed, {} non-video skipped",
            summary.converted.len(),
            summary.dated(),
            summary.failed.len(),
            summary.skipped.len()
        );

        Ok(summary)
    }

    /// Convert one file into `output_dir`.
    pub fn convert_file(&mut self, file: &Path, output_dir: &Path) -> Result<FileOutcome> {
        let info = self
            .engine
            .probe(file)
            .map_err(|e| ConvertError::unsupported_media(file, e))?;
        debug!(
            "Probed {:?}: {} container, video codec {}",
            file,
            info.container,
            info.primary_video().map_or("none", |v| v.codec.as_str())
        );
        let color = ColorProfile::from_primaries(info.color_primaries());

        if self.dry_run {
            let created = creation_date_of(&info);
            let destination = self.destination(file, output_dir, created.as_ref())?;
            info!("[DRY RUN] Would convert {:?} -> {:?}", file, destination);
            return Ok(FileOutcome {
                source: file.to_path_buf(),
                destination,
                created,
                color,
            });
        }

        let workspace = self.transcode(file, color, output_dir)?;

        let created = creation_date_of(&info).or_else(|| {
            debug!("No creation date on source, checking transcoded output");
            self.extract_creation_date(workspace.output())
        });

        let destination = self.rename(workspace, output_dir, created.as_ref())?;

        info!(
            "Converted {:?} to ProRes HQ at {:?}, using color primaries: {}",
            file, destination, color
        );

        Ok(FileOutcome {
            source: file.to_path_buf(),
            destination,
            created,
            color,
        })
    }

    /// Transcode `file` into a fresh workspace under `output_dir`.
    ///
    /// The transcoded file is at `workspace.output()`, named after the
    /// source stem. Dropping the workspace discards it.
    pub fn transcode(
        &self,
        file: &Path,
        color: ColorProfile,
        output_dir: &Path,
    ) -> Result<Workspace> {
        let workspace = Workspace::new_in(file, output_dir, PRORES_EXTENSION)?;

        self.engine
            .transcode(&workspace, color)
            .map_err(|e| ConvertError::unsupported_media(file, e))?;

        Ok(workspace)
    }

    /// Query `file`'s metadata for a usable creation date.
    ///
    /// Returns `None` if the file cannot be probed, carries no tag, or the
    /// tag does not parse.
    pub fn extract_creation_date(&self, file: &Path) -> Option<NaiveDateTime> {
        match self.engine.probe(file) {
            Ok(info) => creation_date_of(&info),
            Err(e) => {
                debug!("Could not probe {:?} for a creation date: {}", file, e);
                None
            }
        }
    }

    /// Move the transcoded output to its final name.
    ///
    /// With a timestamp the name is derived from it, otherwise the default
    /// name from the source stem is kept. Collisions follow the configured
    /// policy.
    pub fn rename(
        &mut self,
        workspace: Workspace,
        output_dir: &Path,
        timestamp: Option<&NaiveDateTime>,
    ) -> Result<PathBuf> {
        let destination = self.destination(workspace.input(), output_dir, timestamp)?;
        Ok(workspace.finalize(&destination)?)
    }

    fn destination(
        &mut self,
        source: &Path,
        output_dir: &Path,
        timestamp: Option<&NaiveDateTime>,
    ) -> Result<PathBuf> {
        let wanted = output_dir.join(self.namer.file_name(source, timestamp));
        let policy = self.config.output.collision;

        let claimed = &self.claimed;
        let sources = &self.sources;
        let source_key = path_key(source);
        let resolved = resolve_collision(
            wanted.clone(),
            policy,
            |p| claimed.contains(p),
            |p| {
                let key = path_key(p);
                key == source_key || sources.contains(&key)
            },
        )?;

        if resolved != wanted {
            warn!(
                "{:?} already exists, using {:?}",
                wanted.file_name().unwrap_or_default(),
                resolved.file_name().unwrap_or_default()
            );
        } else if policy == CollisionPolicy::Overwrite && resolved.exists() {
            warn!("Overwriting existing {:?}", resolved);
        }

        self.claimed.insert(resolved.clone());
        Ok(resolved)
    }
}

/// Canonical form of `path` for comparing against sources.
///
/// Paths that do not exist yet are resolved through their parent.
fn path_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|p| p.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// The parsed creation date carried by probed metadata.
pub fn creation_date_of(info: &MediaInfo) -> Option<NaiveDateTime> {
    let raw = info.creation_time()?;
    let parsed = parse_creation_time(raw);
    if parsed.is_none() {
        warn!(
            "Ignoring unparsable creation_time {:?} on {:?}",
            raw, info.file_path
        );
    }
    parsed
}
