//! File naming rules for scaffolded gadget sources
//!
//! Legacy `.js` and `.css` entries are written as `.ts` and `.less`. The
//! stub written into a new file depends only on its final extension.

/// Extension of gadget scripts
pub const SCRIPT_EXTENSION: &str = ".ts";

/// Extension of gadget stylesheets
pub const STYLE_EXTENSION: &str = ".less";

const LEGACY_SCRIPT_EXTENSION: &str = ".js";
const LEGACY_STYLE_EXTENSION: &str = ".css";

/// Kind of source file, derived from its final name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Script,
    Stylesheet,
    Other,
}

impl FileKind {
    pub fn of(filename: &str) -> Self {
        if filename.ends_with(SCRIPT_EXTENSION) {
            FileKind::Script
        } else if filename.ends_with(STYLE_EXTENSION) {
            FileKind::Stylesheet
        } else {
            FileKind::Other
        }
    }
}

/// Split a file name into stem and extension.
///
/// The extension includes its dot and starts at the last `.`; leading dots
/// never start an extension, so `.eslintrc` has none.
pub fn split_extension(filename: &str) -> (&str, &str) {
    let leading = filename.len() - filename.trim_start_matches('.').len();
    match filename[leading..].rfind('.') {
        Some(idx) => filename.split_at(leading + idx),
        None => (filename, ""),
    }
}

/// Map a legacy extension to the one used in the source tree
pub fn remap_extension(extension: &str) -> &str {
    match extension {
        LEGACY_SCRIPT_EXTENSION => SCRIPT_EXTENSION,
        LEGACY_STYLE_EXTENSION => STYLE_EXTENSION,
        other => other,
    }
}

/// Name a `code` entry is written under
pub fn final_filename(filename: &str) -> String {
    let (stem, extension) = split_extension(filename);
    format!("{}{}", stem, remap_extension(extension))
}

/// Initial contents of a newly created gadget file
pub fn stub_contents(final_name: &str, gadget_name: &str) -> String {
    match FileKind::of(final_name) {
        FileKind::Script => format!("// {}\n// TODO: Implement {}\n", final_name, gadget_name),
        FileKind::Stylesheet => format!("/* {} */\n", final_name),
        FileKind::Other => String::new(),
    }
}

/// Check that a name can be used as exactly one path component
pub fn validate_segment(kind: &str, name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("{} name must not be empty", kind));
    }
    if name == "." || name == ".." {
        return Err(format!("{} name '{}' is not allowed", kind, name));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(format!(
            "{} name '{}' must not contain path separators",
            kind, name
        ));
    }
    Ok(())
}
