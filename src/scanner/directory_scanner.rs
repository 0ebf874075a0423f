use crate::config::FilterConfig;
use crate::error::{ListingError, Result};
use crate::scanner::file_filter::{extension_of, FilterSet, TraversalFilter};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file seen during traversal. Rebuilt on every enumeration, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub name: String,
    pub full_path: PathBuf,
    pub relative_path: PathBuf,
    /// Leading-dot form (`.cs`), empty when the file has no extension.
    pub extension: String,
}

impl FileRecord {
    pub fn new(full_path: PathBuf, relative_path: PathBuf) -> Self {
        let name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = extension_of(&full_path);

        Self {
            name,
            full_path,
            relative_path,
            extension,
        }
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

/// Result of one traversal: every file found, and the subset the filter selects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Enumeration {
    pub root: PathBuf,
    pub all_files: Vec<FileRecord>,
    pub qualifying: Vec<FileRecord>,
}

impl Enumeration {
    /// Every file in listing order, paired with whether it qualifies.
    pub fn marked_files(&self) -> impl Iterator<Item = (&FileRecord, bool)> + '_ {
        let qualifying: HashSet<&Path> = self
            .qualifying
            .iter()
            .map(|record| record.full_path.as_path())
            .collect();

        self.all_files
            .iter()
            .map(move |record| (record, qualifying.contains(record.full_path.as_path())))
    }

    pub fn statistics(&self) -> ScanStatistics {
        let mut files_by_extension = std::collections::BTreeMap::new();
        for record in &self.qualifying {
            *files_by_extension
                .entry(record.extension.clone())
                .or_insert(0usize) += 1;
        }

        ScanStatistics {
            total_files: self.all_files.len(),
            qualifying_files: self.qualifying.len(),
            files_by_extension,
        }
    }
}

pub struct DirectoryScanner {
    traversal: TraversalFilter,
    recursive: bool,
    max_depth: usize,
}

impl DirectoryScanner {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            traversal: TraversalFilter::new(config),
            recursive: config.recursive,
            max_depth: config.max_depth,
        }
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Walk `root` and split its files into the full listing and the
    /// qualifying subset.
    ///
    /// Siblings are visited in file-name order, so two walks over an unchanged
    /// tree produce identical sequences.
    pub fn enumerate<P: AsRef<Path>>(&self, root: P, filters: &FilterSet) -> Result<Enumeration> {
        let root_path = root.as_ref();
        ensure_directory(root_path)?;

        let depth = if self.recursive { self.max_depth } else { 1 };
        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_traverse(root_path, e));

        let mut all_files = Vec::new();
        let mut qualifying = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // The root must be readable; deeper failures only lose that subtree.
                    if err.depth() == 0 {
                        return Err(ListingError::FileRead {
                            path: root_path.to_path_buf(),
                            source: err.into(),
                        });
                    }
                    tracing::warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(root_path)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
            let record = FileRecord::new(entry.path().to_path_buf(), relative_path);

            if filters.contains(&record.extension) {
                qualifying.push(record.clone());
            }
            all_files.push(record);
        }

        tracing::debug!(
            root = %root_path.display(),
            total = all_files.len(),
            qualifying = qualifying.len(),
            "Enumerated directory"
        );

        Ok(Enumeration {
            root: root_path.to_path_buf(),
            all_files,
            qualifying,
        })
    }

    /// Exclusion rules only ever see the path below `root`.
    fn should_traverse(&self, root: &Path, entry: &DirEntry) -> bool {
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if entry.file_type().is_dir() {
            return self.traversal.should_traverse_directory(relative);
        }

        self.traversal.should_visit_file(relative)
    }
}

/// Fail with `NotFound` unless `path` is an existing directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(ListingError::NotFound {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Default, Serialize)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub qualifying_files: usize,
    pub files_by_extension: std::collections::BTreeMap<String, usize>,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Qualifying files: {}\n",
            self.total_files, self.qualifying_files
        );

        if !self.files_by_extension.is_empty() {
            summary.push_str("  Files by type:\n");
            let mut extensions: Vec<_> = self.files_by_extension.iter().collect();
            extensions.sort_by(|a, b| b.1.cmp(a.1));

            for (ext, count) in extensions {
                summary.push_str(&format!("    {}: {} files\n", ext, count));
            }
        }

        summary
    }
}
