//! Output naming.
//!
//! Turns a source path and an optional creation date into the output file
//! name, and settles what happens when that name is already taken.

mod template;

pub use template::TemplateContext;

use crate::config::{CollisionPolicy, NamingConfig};
use crate::error::{ConvertError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDateTime};
use prores_av::PRORES_EXTENSION;
use std::path::{Path, PathBuf};

/// Naive formats accepted after RFC 3339 fails.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Upper bound on `_N` suffixes tried before giving up.
const MAX_SUFFIX: u32 = 9999;

/// Parse a `creation_time` tag value.
///
/// Accepts RFC 3339 (`2021-03-04T10:15:00.000000Z`) and naive
/// `YYYY-MM-DD[T ]HH:MM:SS[.f]` forms. Offsets are dropped: the wall-clock
/// value written in the tag is returned unchanged.
///
/// ```
/// use prores_dater::naming::parse_creation_time;
///
/// let ts = parse_creation_time("2021-03-04T10:15:00.000000Z").unwrap();
/// assert_eq!(ts.to_string(), "2021-03-04 10:15:00");
/// assert!(parse_creation_time("yesterday").is_none());
/// ```
pub fn parse_creation_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
}

/// Check that `format` is a strftime string chrono can render to a
/// non-empty name.
pub fn check_date_format(format: &str) -> std::result::Result<(), String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err("unrecognized strftime specifier".to_string());
    }
    if format.trim().is_empty() {
        return Err("date format is empty".to_string());
    }
    Ok(())
}

/// Builds output names from the naming config.
#[derive(Debug, Clone)]
pub struct Namer {
    date_format: String,
    dated_name: String,
    undated_name: String,
}

impl Namer {
    pub fn new(config: &NamingConfig) -> Self {
        Self {
            date_format: config.date_format.clone(),
            dated_name: config.dated_name.clone(),
            undated_name: config.undated_name.clone(),
        }
    }

    /// Render the date part of a dated name.
    pub fn format_date(&self, created: &NaiveDateTime) -> String {
        created.format(&self.date_format).to_string()
    }

    /// The output stem for `source`.
    ///
    /// With a creation date the dated template is used, otherwise the
    /// undated one. Path separators are replaced so the result is always a
    /// single path component.
    pub fn stem(&self, source: &Path, created: Option<&NaiveDateTime>) -> String {
        let mut ctx = TemplateContext::new().with_source(source);

        let template = match created {
            Some(ts) => {
                ctx.set("created", &self.format_date(ts));
                &self.dated_name
            }
            None => &self.undated_name,
        };

        let stem = sanitize(&ctx.substitute(template));
        if stem.is_empty() || stem == "." || stem == ".." {
            return sanitize(&ctx.substitute("{filestem}"));
        }
        stem
    }

    /// The output file name for `source`, with the ProRes container extension.
    pub fn file_name(&self, source: &Path, created: Option<&NaiveDateTime>) -> String {
        format!("{}.{}", self.stem(source, created), PRORES_EXTENSION)
    }
}

impl Default for Namer {
    fn default() -> Self {
        Self::new(&NamingConfig::default())
    }
}

fn sanitize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Settle a destination path against files already on disk.
///
/// `taken` additionally reports names claimed earlier in the same run that
/// may not exist yet (e.g. during a dry run). `protected` reports paths that
/// must never be written to under any policy, such as the source files of
/// the run. An `Overwrite` destination that is protected gets a suffix
/// instead.
pub fn resolve_collision(
    dest: PathBuf,
    policy: CollisionPolicy,
    taken: impl Fn(&Path) -> bool,
    protected: impl Fn(&Path) -> bool,
) -> Result<PathBuf> {
    let occupied = |p: &Path| p.exists() || taken(p) || protected(p);

    if !occupied(dest.as_path()) {
        return Ok(dest);
    }

    match policy {
        CollisionPolicy::Overwrite if !protected(dest.as_path()) => Ok(dest),
        CollisionPolicy::Fail => Err(ConvertError::rename_collision(dest)),
        CollisionPolicy::Suffix | CollisionPolicy::Overwrite => {
            let parent = dest.parent().map(Path::to_path_buf).unwrap_or_default();
            let stem = dest
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let ext = dest
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();

            (1..=MAX_SUFFIX)
                .map(|n| parent.join(format!("{}_{}{}", stem, n, ext)))
                .find(|candidate| !occupied(candidate.as_path()))
                .ok_or_else(|| ConvertError::rename_collision(dest))
        }
    }
}
