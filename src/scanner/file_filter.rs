use crate::config::FilterConfig;
use crate::error::{EntryKind, ListingError, Result};
use regex::Regex;
use std::path::Path;

/// The user-managed set of extensions that count as source code.
///
/// Entries are kept in insertion order and in canonical leading-dot form
/// (`.cs`), with case preserved as entered. Matching is exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    extensions: Vec<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw inputs, rejecting the first invalid or duplicate one.
    pub fn from_inputs<I, S>(inputs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for input in inputs {
            set.add(input.as_ref())?;
        }
        Ok(set)
    }

    /// Normalize user input: trim it, then prefix `.` unless it already starts
    /// with one.
    ///
    /// Only single-segment extensions can ever match a file, so inputs such as
    /// `tar.gz`, `g.cs` or `cs.` are rejected.
    pub fn normalize(input: &str) -> Result<String> {
        let trimmed = input.trim();
        let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if bare.is_empty() || bare.contains('.') {
            return Err(ListingError::InvalidExtension {
                input: input.to_string(),
            });
        }

        Ok(format!(".{}", bare))
    }

    /// Add an extension, returning its canonical form.
    pub fn add(&mut self, input: &str) -> Result<String> {
        let canonical = Self::normalize(input)?;
        let raw = input.trim();

        if self.contains(&canonical) || self.contains(raw) {
            return Err(ListingError::DuplicateEntry {
                kind: EntryKind::Extension,
                value: canonical,
            });
        }

        self.extensions.push(canonical.clone());
        Ok(canonical)
    }

    /// Remove an extension given in either raw or canonical form.
    pub fn remove(&mut self, input: &str) -> bool {
        let Ok(canonical) = Self::normalize(input) else {
            return false;
        };
        let before = self.extensions.len();
        self.extensions.retain(|e| e != &canonical);
        before != self.extensions.len()
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e == extension)
    }

    /// True when `path`'s extension (in `.ext` form) is a member of the set.
    pub fn matches(&self, path: &Path) -> bool {
        let extension = extension_of(path);
        !extension.is_empty() && self.contains(&extension)
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.extensions.clone()
    }
}

/// Extension of `path` in leading-dot form, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Decides which directories and files the enumerator may visit at all.
pub struct TraversalFilter {
    exclude_dirs: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl TraversalFilter {
    pub fn new(config: &FilterConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!("Ignoring invalid exclude pattern '{}': {}", pattern, e);
                    None
                }
            })
            .collect();

        Self {
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_patterns,
        }
    }

    pub fn should_traverse_directory(&self, path: &Path) -> bool {
        if let Some(dir_name) = path.file_name().and_then(|s| s.to_str()) {
            if self.exclude_dirs.iter().any(|exclude| exclude == dir_name) {
                return false;
            }
        }

        !self.matches_any_pattern(&path.to_string_lossy())
    }

    pub fn should_visit_file(&self, path: &Path) -> bool {
        !self.matches_any_pattern(&path.to_string_lossy())
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }
}
