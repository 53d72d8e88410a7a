//! Variable substitution for output name templates.

use std::collections::HashMap;
use std::path::Path;

/// Variable substitution context for output name templates.
///
/// Supports variable substitution in strings using the `{varname}` syntax.
///
/// # Example
///
/// ```
/// use prores_dater::naming::TemplateContext;
/// use std::path::Path;
///
/// let ctx = TemplateContext::new()
///     .with_source(Path::new("/card/IMG_0001.MOV"))
///     .with_var("created", "2021-03-04_10-15-00");
///
/// assert_eq!(ctx.substitute("{filestem}"), "IMG_0001");
/// assert_eq!(ctx.substitute("{created}_ProResHQ"), "2021-03-04_10-15-00_ProResHQ");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateContext {
    vars: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty template context.
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    /// Set source-file variables.
    ///
    /// This adds the following variables:
    /// - `{filename}` - Source file name with extension
    /// - `{filestem}` - Source file name without extension
    /// - `{extension}` - Source file extension
    pub fn with_source(mut self, source: &Path) -> Self {
        if let Some(name) = source.file_name() {
            self.set("filename", &name.to_string_lossy());
        }
        if let Some(stem) = source.file_stem() {
            self.set("filestem", &stem.to_string_lossy());
        }
        self.set(
            "extension",
            &source
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default(),
        );
        self
    }

    /// Add a custom variable.
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// Set a variable.
    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    /// Get a variable value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|s| s.as_str())
    }

    /// Substitute variables in a string.
    ///
    /// Variables are in the form `{varname}`. Unknown variables are left as-is.
    pub fn substitute(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.vars {
            result = result.replace(&format!("{{{}}}", key), value);
        }
        result
    }
}

impl Default for TemplateContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_vars() {
        let ctx = TemplateContext::new().with_source(Path::new("/card/DCIM/clip.take2.mp4"));

        assert_eq!(ctx.substitute("{filename}"), "clip.take2.mp4");
        assert_eq!(ctx.substitute("{filestem}"), "clip.take2");
        assert_eq!(ctx.substitute("{extension}"), "mp4");
    }

    #[test]
    fn test_no_extension() {
        let ctx = TemplateContext::new().with_source(Path::new("/card/CLIP"));
        assert_eq!(ctx.get("extension"), Some(""));
        assert_eq!(ctx.substitute("{filestem}"), "CLIP");
    }

    #[test]
    fn test_custom_var() {
        let ctx = TemplateContext::new()
            .with_var("created", "20210304_101500")
            .with_var("camera", "gopro");

        assert_eq!(
            ctx.substitute("{created}_{camera}"),
            "20210304_101500_gopro"
        );
    }

    #[test]
    fn test_unknown_var_left_alone() {
        let ctx = TemplateContext::new().with_var("created", "x");
        assert_eq!(ctx.substitute("{created}-{missing}"), "x-{missing}");
    }
}
