//! Application state: tracked directories, the extension filter, and the
//! file listing of the selected directory.
//!
//! All mutation goes through methods; callers only get read-only views.

use crate::error::{EntryKind, ListingError, Result};
use crate::scanner::{ensure_directory, DirectoryScanner, Enumeration, FilterSet};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub full_path: PathBuf,
}

impl DirectoryEntry {
    fn from_path(full_path: PathBuf) -> Self {
        let name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| full_path.display().to_string());
        Self { name, full_path }
    }
}

#[derive(Debug, Default)]
pub struct Workspace {
    directories: Vec<DirectoryEntry>,
    filters: FilterSet,
    selected: Option<usize>,
    listing: Option<Enumeration>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a directory and make it the selected one.
    ///
    /// Paths are compared after canonicalization, so `./src` and the absolute
    /// path of the same directory are duplicates.
    pub fn add_directory<P: AsRef<Path>>(&mut self, path: P) -> Result<&DirectoryEntry> {
        let path = path.as_ref();
        ensure_directory(path)?;

        let full_path = path.canonicalize().map_err(|_| ListingError::NotFound {
            path: path.display().to_string(),
        })?;

        if self.directories.iter().any(|d| d.full_path == full_path) {
            return Err(ListingError::DuplicateEntry {
                kind: EntryKind::Directory,
                value: full_path.display().to_string(),
            });
        }

        tracing::debug!(path = %full_path.display(), "Added directory");
        self.directories.push(DirectoryEntry::from_path(full_path));
        let index = self.directories.len() - 1;
        self.selected = Some(index);
        self.listing = None;

        Ok(&self.directories[index])
    }

    /// Stop tracking the directory at `index`. The file listing is cleared.
    pub fn remove_directory(&mut self, index: usize) -> Result<DirectoryEntry> {
        if index >= self.directories.len() {
            return Err(ListingError::NoSuchSelection {
                selector: format!("#{}", index + 1),
            });
        }

        let removed = self.directories.remove(index);
        self.listing = None;
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };

        Ok(removed)
    }

    pub fn add_extension(&mut self, input: &str) -> Result<String> {
        self.filters.add(input)
    }

    pub fn remove_extension(&mut self, input: &str) -> bool {
        self.filters.remove(input)
    }

    /// Drop a file from the displayed listing; nothing on disk changes and the
    /// next refresh brings it back.
    pub fn forget_file(&mut self, name: &str) -> bool {
        let Some(listing) = self.listing.as_mut() else {
            return false;
        };

        let matches = |record: &crate::scanner::FileRecord| {
            record.name == name || record.relative_path == Path::new(name)
        };
        let before = listing.all_files.len();
        listing.all_files.retain(|r| !matches(r));
        listing.qualifying.retain(|r| !matches(r));
        before != listing.all_files.len()
    }

    /// Select a tracked directory by 1-based position, name or path.
    pub fn select(&mut self, selector: &str) -> Result<&DirectoryEntry> {
        let index = match selector.trim().parse::<usize>() {
            Ok(position) if position >= 1 && position <= self.directories.len() => Some(position - 1),
            _ => self.directories.iter().position(|d| {
                d.name == selector || d.full_path == Path::new(selector)
            }),
        };

        match index {
            Some(index) => {
                if self.selected != Some(index) {
                    self.listing = None;
                }
                self.selected = Some(index);
                Ok(&self.directories[index])
            }
            None => Err(ListingError::NoSuchSelection {
                selector: selector.to_string(),
            }),
        }
    }

    pub fn selected(&self) -> Option<&DirectoryEntry> {
        self.selected.and_then(|i| self.directories.get(i))
    }

    /// Re-enumerate the selected directory with the current filter set.
    pub fn refresh_listing(&mut self, scanner: &DirectoryScanner) -> Result<&Enumeration> {
        let selected = self.selected().cloned().ok_or_else(|| ListingError::NoSuchSelection {
            selector: "no directory selected".to_string(),
        })?;

        let enumeration = scanner.enumerate(&selected.full_path, &self.filters)?;
        Ok(&*self.listing.insert(enumeration))
    }

    pub fn directories(&self) -> &[DirectoryEntry] {
        &self.directories
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn listing(&self) -> Option<&Enumeration> {
        self.listing.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use std::fs;
    use tempfile::TempDir;

    fn create_project() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Program.cs"), "class P {}\n").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "n\n").unwrap();
        temp_dir
    }

    #[test]
    fn test_add_directory_selects_it() {
        let first = create_project();
        let second = create_project();
        let mut workspace = Workspace::new();

        workspace.add_directory(first.path()).unwrap();
        workspace.add_directory(second.path()).unwrap();

        assert_eq!(workspace.directories().len(), 2);
        assert_eq!(
            workspace.selected().unwrap().full_path,
            second.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_duplicate_directory_after_canonicalization() {
        let project = create_project();
        fs::create_dir(project.path().join("sub")).unwrap();
        let mut workspace = Workspace::new();

        workspace.add_directory(project.path()).unwrap();
        let result = workspace.add_directory(project.path().join("sub").join(".."));

        assert!(matches!(
            result,
            Err(ListingError::DuplicateEntry {
                kind: EntryKind::Directory,
                ..
            })
        ));
        assert_eq!(workspace.directories().len(), 1);
    }

    #[test]
    fn test_add_missing_directory() {
        let mut workspace = Workspace::new();
        let result = workspace.add_directory("/no/such/place");
        assert!(matches!(result, Err(ListingError::NotFound { .. })));
        assert!(workspace.selected().is_none());
    }

    #[test]
    fn test_remove_directory_clears_listing() {
        let project = create_project();
        let mut workspace = Workspace::new();
        workspace.add_directory(project.path()).unwrap();
        workspace.add_extension("cs").unwrap();
        workspace
            .refresh_listing(&DirectoryScanner::new(&FilterConfig::default()))
            .unwrap();
        assert!(workspace.listing().is_some());

        let removed = workspace.remove_directory(0).unwrap();
        assert_eq!(removed.full_path, project.path().canonicalize().unwrap());
        assert!(workspace.listing().is_none());
        assert!(workspace.selected().is_none());
        assert!(matches!(
            workspace.remove_directory(0),
            Err(ListingError::NoSuchSelection { .. })
        ));
    }

    #[test]
    fn test_refresh_and_forget_file() {
        let project = create_project();
        let mut workspace = Workspace::new();
        workspace.add_directory(project.path()).unwrap();
        workspace.add_extension(".cs").unwrap();

        let listing = workspace
            .refresh_listing(&DirectoryScanner::new(&FilterConfig::default()))
            .unwrap();
        assert_eq!(listing.all_files.len(), 2);
        assert_eq!(listing.qualifying.len(), 1);

        assert!(workspace.forget_file("notes.txt"));
        assert!(!workspace.forget_file("notes.txt"));
        assert_eq!(workspace.listing().unwrap().all_files.len(), 1);
        assert!(project.path().join("notes.txt").exists());
    }

    #[test]
    fn test_select_by_position_and_name() {
        let first = create_project();
        let second = create_project();
        let mut workspace = Workspace::new();
        workspace.add_directory(first.path()).unwrap();
        workspace.add_directory(second.path()).unwrap();

        let entry = workspace.select("1").unwrap().clone();
        assert_eq!(entry.full_path, first.path().canonicalize().unwrap());

        let name = workspace.directories()[1].name.clone();
        assert_eq!(workspace.select(&name).unwrap().name, name);

        assert!(matches!(
            workspace.select("7"),
            Err(ListingError::NoSuchSelection { .. })
        ));
        assert!(workspace.select("nothing-like-this").is_err());
    }

    #[test]
    fn test_extension_management() {
        let mut workspace = Workspace::new();
        assert_eq!(workspace.add_extension("cs").unwrap(), ".cs");
        assert!(workspace.add_extension(".cs").is_err());
        assert!(workspace.remove_extension("cs"));
        assert!(workspace.filters().is_empty());
    }
}
