use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found: {path}")]
    NotFound { path: String },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("No tracked directory matches: {selector}")]
    NoSuchSelection { selector: String },

    #[error("{kind} already added: {value}")]
    DuplicateEntry { kind: EntryKind, value: String },

    #[error("Invalid file extension: '{input}'")]
    InvalidExtension { input: String },

    #[error("No file extensions configured")]
    EmptyFilter,

    #[error("A listing run is already in progress")]
    Busy,

    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {message}", path.display())]
    OutputWrite { path: PathBuf, message: String },

    #[error("Cannot preview file: {path}")]
    UnsupportedPreview { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

/// What a [`ListingError::DuplicateEntry`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Extension,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Directory => write!(f, "Directory"),
            EntryKind::Extension => write!(f, "Extension"),
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ListingError {
    fn user_message(&self) -> String {
        match self {
            ListingError::NotFound { path } => {
                format!("Directory does not exist or is not a directory: {}", path)
            }
            ListingError::FileNotFound { path } => {
                format!("File does not exist or is not a regular file: {}", path.display())
            }
            ListingError::NoSuchSelection { selector } => {
                format!("No tracked directory matches '{}'", selector)
            }
            ListingError::DuplicateEntry { kind, value } => {
                format!("{} has already been added: {}", kind, value)
            }
            ListingError::InvalidExtension { input } => {
                if input.trim().is_empty() {
                    "File extension is empty and cannot be added".to_string()
                } else {
                    format!("Invalid file extension: {}", input)
                }
            }
            ListingError::EmptyFilter => {
                "No source file extensions are configured".to_string()
            }
            ListingError::Busy => "Files are already being processed".to_string(),
            ListingError::FileRead { path, source } => {
                format!("Could not read {} as text: {}", path.display(), source)
            }
            ListingError::OutputWrite { path, message } => {
                format!("Could not write {}: {}", path.display(), message)
            }
            ListingError::UnsupportedPreview { path } => {
                format!("This file type cannot be opened: {}", path)
            }
            ListingError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ListingError::Cancelled => "Operation was cancelled by user".to_string(),
            ListingError::Io(e) => format!("IO error: {}", e),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ListingError::NotFound { .. } => Some(
                "Check the path and make sure it points to an existing directory.".to_string()
            ),
            ListingError::NoSuchSelection { .. } => Some(
                "Select a directory by its 1-based position, its name or its path; pass it as a positional argument first.".to_string()
            ),
            ListingError::DuplicateEntry { .. } => Some(
                "Each directory and extension only needs to be added once.".to_string()
            ),
            ListingError::InvalidExtension { .. } => Some(
                "Pass single extensions like 'rs' or '.rs' with --ext (e.g., --ext rs,toml).".to_string()
            ),
            ListingError::EmptyFilter => Some(
                "Add at least one extension with --ext (e.g., --ext cs,xaml) or in the [filters] section of your config file.".to_string()
            ),
            ListingError::Busy => Some(
                "Wait for the current run to finish before starting another one.".to_string()
            ),
            ListingError::FileRead { .. } => Some(
                "Make sure every matching file is readable UTF-8 text, or remove its extension from the filter, then run again.".to_string()
            ),
            ListingError::OutputWrite { .. } => Some(
                "Choose a different output path with --output or check write permissions. A .txt file may already have been written.".to_string()
            ),
            ListingError::UnsupportedPreview { .. } => Some(
                "Only configured image and text extensions can be previewed.".to_string()
            ),
            ListingError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all values are valid.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ListingError {
    fn from(error: toml::de::Error) -> Self {
        ListingError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ListingError>;
