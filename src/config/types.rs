use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory created next to a file input, or inside a directory input
    #[serde(default = "default_output_dir_name")]
    pub dir_name: String,

    /// Explicit output directory; overrides `dir_name` placement
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// What to do when the destination name is already taken
    #[serde(default)]
    pub collision: CollisionPolicy,
}

fn default_output_dir_name() -> String {
    "converted_videos".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir_name: default_output_dir_name(),
            dir: None,
            collision: CollisionPolicy::default(),
        }
    }
}

/// Behavior when an output name is already in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append `_1`, `_2`, ... to the stem until the name is free
    #[default]
    Suffix,
    /// Replace the existing file
    Overwrite,
    /// Report the file as failed and discard the transcode
    Fail,
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "suffix" => Ok(CollisionPolicy::Suffix),
            "overwrite" => Ok(CollisionPolicy::Overwrite),
            "fail" => Ok(CollisionPolicy::Fail),
            _ => Err(format!(
                "Unknown collision policy: {} (expected suffix, overwrite or fail)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamingConfig {
    /// strftime format applied to the creation date
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Stem template when a creation date is known
    #[serde(default = "default_dated_name")]
    pub dated_name: String,

    /// Stem template when no creation date is available
    #[serde(default = "default_undated_name")]
    pub undated_name: String,
}

fn default_date_format() -> String {
    "%Y-%m-%d_%H-%M-%S".to_string()
}
fn default_dated_name() -> String {
    "{created}".to_string()
}
fn default_undated_name() -> String {
    "{filestem}".to_string()
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            dated_name: default_dated_name(),
            undated_name: default_undated_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Descend into subdirectories
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Extensions to treat as video in addition to the built-in list
    #[serde(default)]
    pub extra_extensions: Vec<String>,
}

fn default_recursive() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: default_recursive(),
            extra_extensions: Vec::new(),
        }
    }
}
