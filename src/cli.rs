use clap::Parser;
use prores_dater::config::CollisionPolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "to-ProResHQ-by-CreationDate")]
#[command(
    author,
    version,
    about = "Convert videos to ProRes 422 HQ and name them by creation date"
)]
pub struct Cli {
    /// Video file or directory of videos to convert
    #[arg(required_unless_present = "check_tools")]
    pub path: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Write outputs here instead of a converted_videos directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Only convert files directly inside the given directory
    #[arg(long)]
    pub no_recursive: bool,

    /// What to do when an output name is already taken (suffix, overwrite, fail)
    #[arg(long, value_name = "POLICY")]
    pub on_collision: Option<CollisionPolicy>,

    /// Show what would be done without transcoding
    #[arg(long)]
    pub dry_run: bool,

    /// Check that ffmpeg and ffprobe are available, then exit
    #[arg(long)]
    pub check_tools: bool,
}
