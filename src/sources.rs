//! Sprite source resolution and game detection
//!
//! Source arguments may be folders, single files or glob patterns. They are
//! qualified against the working directory, globbed, and scanned for breed
//! files to work out which game the sprites belong to.

use glob::glob;
use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

use crate::variant::GameVariant;

/// Extensions of files that belong to a breed.
pub const BREED_FILE_EXTENSIONS: [&str; 4] = ["spr", "s16", "c16", "att"];

/// Error type for source resolution
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// Arguments that look like options but are not files
    #[error("Invalid source directories found: [\n\t{}\n]\nWere these meant to be options? Check prefix dashes and option spelling", .0.join("\n\t"))]
    LikelyOptions(Vec<String>),
    /// A concrete source path does not exist
    #[error("Source path does not exist: {}", .0.display())]
    Missing(PathBuf),
    /// Invalid glob pattern
    #[error("Invalid source pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
    #[error("Failed to read source: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to ascertain game variant type. Specify game variant with --game")]
    UnknownVariant,
    #[error("Too many game variants detected ({}). Specify game variant with --game", .0.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    AmbiguousVariant(Vec<GameVariant>),
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        if let Ok(home) = env::var("HOME") {
            return PathBuf::from(home).join(path.trim_start_matches('~').trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

/// Drop an `[alias]=` prefix, keeping the path it names.
pub fn strip_alias(source: &str) -> &str {
    if source.starts_with('[') {
        if let Some(end) = source.find("]=") {
            return &source[end + 2..];
        }
    }
    source
}

/// Make a source argument absolute.
///
/// Expands `~`, strips a leading `./` and joins relative paths onto `cwd`.
pub fn qualify(source: &str, cwd: &Path) -> PathBuf {
    let source = source.strip_prefix("./").unwrap_or(source);
    let path = expand_tilde(source);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

fn has_wildcard(s: &str) -> bool {
    s.contains('*') || s.contains('[') || s.contains('{')
}

/// Expand `{a,b}` alternatives into separate patterns.
///
/// The glob crate has no brace support, so `Images/{a,b}*.c16` becomes
/// `Images/a*.c16` and `Images/b*.c16`. Nested groups expand recursively; an
/// unmatched `{` is left as is.
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let i = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(i),
            _ => {}
        }
    }
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| {
            let option = &pattern[w[0] + 1..w[1]];
            expand_braces(&format!("{}{}{}", head, option, tail))
        })
        .collect()
}

/// The folder above the first wildcard component, if any.
fn concrete_prefix(path: &Path) -> Option<PathBuf> {
    let mut prefix = PathBuf::new();
    for component in path.components() {
        if has_wildcard(&component.as_os_str().to_string_lossy()) {
            return if prefix.as_os_str().is_empty() { None } else { Some(prefix) };
        }
        prefix.push(component);
    }
    Some(prefix)
}

/// Resolve source arguments into concrete files and folders.
///
/// Glob matches come first, followed by the concrete folders the arguments
/// name (for patterns, the folder above the first wildcard).
pub fn resolve_sources<S: AsRef<str>>(sources: &[S], cwd: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let likely_options: Vec<String> = sources
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| s.starts_with('-') && !qualify(s, cwd).exists())
        .map(str::to_string)
        .collect();
    if !likely_options.is_empty() {
        return Err(SourceError::LikelyOptions(likely_options));
    }

    let qualified: Vec<PathBuf> =
        sources.iter().map(|s| qualify(strip_alias(s.as_ref()), cwd)).collect();

    let mut folders = Vec::new();
    let mut matches = Vec::new();
    for path in &qualified {
        let text = path.to_string_lossy();
        if !has_wildcard(&text) {
            if !path.exists() {
                return Err(SourceError::Missing(path.clone()));
            }
            folders.push(path.clone());
            continue;
        }

        if let Some(prefix) = concrete_prefix(path) {
            folders.push(prefix);
        }
        for pattern in expand_braces(&text) {
            let paths = glob(&pattern).map_err(|e| SourceError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            matches.extend(paths.filter_map(Result::ok));
        }
    }

    trace!(?folders, "source folders");
    trace!(?matches, "glob results");

    matches.extend(folders);
    let mut seen = HashSet::new();
    matches.retain(|path| seen.insert(path.clone()));
    Ok(matches)
}

/// True for sprite part file stems such as `a00a` or `m45z`.
///
/// Part letter `a`-`q`, life stage digit, breed slot digit `0`-`7` each, then
/// the breed character.
pub fn is_part_name(stem: &str) -> bool {
    let chars: Vec<char> = stem.to_ascii_lowercase().chars().collect();
    chars.len() == 4
        && ('a'..='q').contains(&chars[0])
        && ('0'..='7').contains(&chars[1])
        && ('0'..='7').contains(&chars[2])
        && (chars[3].is_ascii_lowercase() || chars[3].is_ascii_digit())
}

/// Breed files found under a set of source roots.
#[derive(Debug, Clone, Default)]
pub struct SourceFiles {
    pub roots: Vec<PathBuf>,
}

impl SourceFiles {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Breed files in every root (not recursive), grouped by lowercase extension.
    pub fn breed_files(&self) -> Result<BTreeMap<String, Vec<PathBuf>>, SourceError> {
        let mut files: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for root in &self.roots {
            let candidates: Vec<PathBuf> = if root.is_dir() {
                fs::read_dir(root)?.filter_map(Result::ok).map(|e| e.path()).collect()
            } else {
                vec![root.clone()]
            };
            for path in candidates {
                let extension = path.extension().and_then(|e| e.to_str()).map(str::to_lowercase);
                let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
                match extension {
                    Some(ext) if BREED_FILE_EXTENSIONS.contains(&ext.as_str()) && is_part_name(stem) => {
                        files.entry(ext).or_default().push(path);
                    }
                    _ => {}
                }
            }
        }
        for (extension, paths) in &files {
            debug!(extension = %extension, count = paths.len(), "breed files");
        }
        Ok(files)
    }

    /// Work out the game from the breed files present.
    ///
    /// `spr` means C1. `s16` with 10 line attachment files means C2. `c16`,
    /// or `s16` with 16 line attachment files, means C3. Exactly one must match.
    pub fn detect_variant(&self) -> Result<GameVariant, SourceError> {
        let files = self.breed_files()?;
        let has = |ext: &str| files.get(ext).is_some_and(|v| !v.is_empty());
        let att_with_lines = |lines: usize| {
            files.get("att").is_some_and(|atts| atts.iter().any(|p| att_line_count(p) == Some(lines)))
        };

        let is_c1 = has("spr");
        let is_c2 = has("s16") && att_with_lines(10);
        let is_c3 = has("c16") || (has("s16") && att_with_lines(16));

        let detected: Vec<GameVariant> = [(is_c1, GameVariant::C1), (is_c2, GameVariant::C2), (is_c3, GameVariant::C3)]
            .into_iter()
            .filter_map(|(found, variant)| found.then_some(variant))
            .collect();

        match detected.as_slice() {
            [variant] => {
                debug!(variant = %variant, "detected game variant");
                Ok(*variant)
            }
            [] => Err(SourceError::UnknownVariant),
            _ => Err(SourceError::AmbiguousVariant(detected)),
        }
    }
}

/// Non-blank lines in an attachment file. Unreadable files count as `None`.
fn att_line_count(path: &Path) -> Option<usize> {
    match fs::read(path) {
        // Attachment files are CP1252 text; line counting only needs the newlines
        Ok(bytes) => Some(
            String::from_utf8_lossy(&bytes).split('\n').filter(|l| !l.trim().is_empty()).count(),
        ),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "failed to read attachment file");
            None
        }
    }
}
