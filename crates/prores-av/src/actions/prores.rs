//! ProRes 422 HQ transcoding.

use crate::{Error, Result, Workspace};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Container extension for ProRes output.
pub const PRORES_EXTENSION: &str = "mov";

/// How many trailing stderr lines to keep in a failure message.
const STDERR_TAIL_LINES: usize = 8;

/// Shared ProRes 422 HQ encoder settings.
const PRORES_HQ_ARGS: &[&str] = &[
    "-c:v",
    "prores_ks",
    "-profile:v",
    "3",
    "-vendor",
    "apl0",
    "-bits_per_mb",
    "8000",
    "-pix_fmt",
    "yuv422p10le",
    "-c:a",
    "pcm_s24le",
];

/// Full-range to limited-range scaling, used when the source is tagged.
const RANGE_SCALE_ARGS: &[&str] = &[
    "-sws_flags",
    "print_info+accurate_rnd+bitexact+full_chroma_int",
    "-vf",
    "zscale=rangein=full:range=limited",
];

/// Source color profile, which picks the scaling and tagging arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorProfile {
    /// Rec. 709 (HD SDR).
    Bt709,
    /// Rec. 2020 primaries with HLG transfer, as phones record HDR.
    Bt2020Hlg,
    /// Untagged or anything else: encode without color tagging.
    Unknown,
}

impl ColorProfile {
    /// Classify ffprobe's `color_primaries` value.
    pub fn from_primaries(primaries: Option<&str>) -> Self {
        match primaries.map(|p| p.trim().to_lowercase()).as_deref() {
            Some("bt709") => ColorProfile::Bt709,
            Some("bt2020") => ColorProfile::Bt2020Hlg,
            _ => ColorProfile::Unknown,
        }
    }

    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            ColorProfile::Bt709 => "bt709",
            ColorProfile::Bt2020Hlg => "bt2020",
            ColorProfile::Unknown => "unknown",
        }
    }

    fn tag_args(&self) -> &'static [&'static str] {
        match self {
            ColorProfile::Bt709 => &[
                "-color_primaries",
                "bt709",
                "-color_trc",
                "bt709",
                "-color_range",
                "pc",
                "-colorspace",
                "bt709",
            ],
            ColorProfile::Bt2020Hlg => &[
                "-color_primaries",
                "bt2020",
                "-color_trc",
                "arib-std-b67",
                "-color_range",
                "pc",
                "-colorspace",
                "bt2020nc",
            ],
            ColorProfile::Unknown => &[],
        }
    }
}

impl std::fmt::Display for ColorProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Build the ffmpeg argument list for a ProRes 422 HQ transcode.
pub fn prores_args(input: &Path, output: &Path, color: ColorProfile) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-y", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_os_string());

    if color != ColorProfile::Unknown {
        args.extend(RANGE_SCALE_ARGS.iter().map(OsString::from));
    }
    args.extend(["-map_metadata", "0"].iter().map(OsString::from));
    args.extend(PRORES_HQ_ARGS.iter().map(OsString::from));
    args.extend(color.tag_args().iter().map(OsString::from));

    args.push(output.as_os_str().to_os_string());
    args
}

/// Transcode the workspace input to ProRes 422 HQ at the workspace output.
///
/// Blocks until ffmpeg exits. stdout and stderr are captured; on failure the
/// tail of stderr is carried in the error.
pub fn transcode_to_prores(ffmpeg: &Path, workspace: &Workspace, color: ColorProfile) -> Result<()> {
    let input = workspace.input();
    let output = workspace.output();

    #[cfg(feature = "tracing")]
    tracing::info!("Transcoding {:?} to ProRes 422 HQ ({})", input, color);

    let result = Command::new(ffmpeg)
        .args(prores_args(input, output, color))
        .output()
        .map_err(|e| Error::from_spawn("ffmpeg", e))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(Error::tool_failed(
            "ffmpeg",
            format!("{}: {}", result.status, stderr_tail(&stderr)),
        ));
    }

    if !output.exists() {
        return Err(Error::tool_failed(
            "ffmpeg",
            format!("exited successfully but wrote no output at {:?}", output),
        ));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Transcode complete: {:?}", output);

    Ok(())
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_str(color: ColorProfile) -> Vec<String> {
        prores_args(Path::new("/in/clip.mp4"), Path::new("/out/clip.mov"), color)
            .into_iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_from_primaries() {
        assert_eq!(ColorProfile::from_primaries(Some("bt709")), ColorProfile::Bt709);
        assert_eq!(
            ColorProfile::from_primaries(Some("BT2020")),
            ColorProfile::Bt2020Hlg
        );
        assert_eq!(
            ColorProfile::from_primaries(Some("smpte170m")),
            ColorProfile::Unknown
        );
        assert_eq!(ColorProfile::from_primaries(None), ColorProfile::Unknown);
    }

    #[test]
    fn test_untagged_args() {
        let args = args_str(ColorProfile::Unknown);

        assert_eq!(&args[..5], &["-hide_banner", "-nostdin", "-y", "-i", "/in/clip.mp4"]);
        assert!(args.windows(2).any(|w| w == ["-c:v", "prores_ks"]));
        assert!(args.windows(2).any(|w| w == ["-profile:v", "3"]));
        assert!(args.windows(2).any(|w| w == ["-pix_fmt", "yuv422p10le"]));
        assert!(args.windows(2).any(|w| w == ["-c:a", "pcm_s24le"]));
        assert!(args.windows(2).any(|w| w == ["-map_metadata", "0"]));
        assert!(!args.iter().any(|a| a == "-vf"));
        assert!(!args.iter().any(|a| a == "-color_primaries"));
        assert_eq!(args.last().unwrap(), "/out/clip.mov");
    }

    #[test]
    fn test_bt709_args() {
        let args = args_str(ColorProfile::Bt709);

        assert!(args.windows(2).any(|w| w == ["-vf", "zscale=rangein=full:range=limited"]));
        assert!(args.windows(2).any(|w| w == ["-color_trc", "bt709"]));
        assert!(args.windows(2).any(|w| w == ["-colorspace", "bt709"]));
    }

    #[test]
    fn test_bt2020_args() {
        let args = args_str(ColorProfile::Bt2020Hlg);

        assert!(args.windows(2).any(|w| w == ["-color_primaries", "bt2020"]));
        assert!(args.windows(2).any(|w| w == ["-color_trc", "arib-std-b67"]));
        assert!(args.windows(2).any(|w| w == ["-colorspace", "bt2020nc"]));
    }

    #[test]
    fn test_stderr_tail() {
        let stderr = (1..=20).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let tail = stderr_tail(&stderr);
        assert!(tail.starts_with("line 13"));
        assert!(tail.ends_with("line 20"));
    }

    #[test]
    fn test_missing_ffmpeg() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new_in("clip.mp4", dir.path(), PRORES_EXTENSION).unwrap();
        let err = transcode_to_prores(
            Path::new("nonexistent_ffmpeg_12345"),
            &workspace,
            ColorProfile::Unknown,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }
}
