use crate::error::{ListingError, Result};
use crate::pipeline::document::{write_docx, DocumentPreset};
use crate::pipeline::LineBuffer;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The two files produced from one destination base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub text: PathBuf,
    pub document: PathBuf,
}

impl ArtifactPaths {
    /// Append `.txt` and `.docx` to `base` without touching any dots it
    /// already contains.
    pub fn for_base(base: &Path) -> Self {
        Self {
            text: with_suffix(base, ".txt"),
            document: with_suffix(base, ".docx"),
        }
    }
}

pub struct OutputWriter {
    preset: DocumentPreset,
}

impl OutputWriter {
    pub fn new(preset: DocumentPreset) -> Self {
        Self { preset }
    }

    pub fn preset(&self) -> &DocumentPreset {
        &self.preset
    }

    /// Write `<base>.txt` then `<base>.docx`, overwriting both.
    ///
    /// If the document fails the text file stays on disk; the error is still
    /// returned.
    pub fn write(&self, buffer: &LineBuffer, base: &Path) -> Result<usize> {
        let paths = ArtifactPaths::for_base(base);
        ensure_parent(&paths.text)?;

        fs::write(&paths.text, buffer.joined()).map_err(|e| ListingError::OutputWrite {
            path: paths.text.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %paths.text.display(), lines = buffer.len(), "Wrote text listing");

        let file = fs::File::create(&paths.document).map_err(|e| ListingError::OutputWrite {
            path: paths.document.clone(),
            message: e.to_string(),
        })?;
        let mut writer = write_docx(BufWriter::new(file), buffer, &self.preset).map_err(|e| {
            ListingError::OutputWrite {
                path: paths.document.clone(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|e| ListingError::OutputWrite {
            path: paths.document.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %paths.document.display(), "Wrote document listing");

        Ok(buffer.len())
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new(DocumentPreset::default())
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ListingError::OutputWrite {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn sample_buffer() -> LineBuffer {
        ["using System;", "class A {}", "  // indented"]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_artifact_paths_keep_existing_dots() {
        let paths = ArtifactPaths::for_base(Path::new("/out/listing.v2"));
        assert_eq!(paths.text, PathBuf::from("/out/listing.v2.txt"));
        assert_eq!(paths.document, PathBuf::from("/out/listing.v2.docx"));
    }

    #[test]
    fn test_text_artifact_matches_buffer() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("listing");
        let buffer = sample_buffer();

        let written = OutputWriter::default().write(&buffer, &base).unwrap();
        assert_eq!(written, 3);

        let text = fs::read_to_string(temp_dir.path().join("listing.txt")).unwrap();
        assert!(!text.ends_with('\n'));
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines, buffer.lines());
    }

    #[test]
    fn test_document_uses_preset() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("listing");
        let writer = OutputWriter::new(DocumentPreset {
            font_family: "Consolas".to_string(),
            font_size: 9.0,
        });

        writer.write(&sample_buffer(), &base).unwrap();

        let file = fs::File::open(temp_dir.path().join("listing.docx")).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut document)
            .unwrap();

        assert!(document.contains(r#"w:ascii="Consolas""#));
        assert!(document.contains(r#"<w:sz w:val="18"/>"#));
        assert!(document.contains("class A {}"));
    }

    #[test]
    fn test_overwrites_and_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("deeper").join("listing");
        let writer = OutputWriter::default();

        writer.write(&sample_buffer(), &base).unwrap();
        let smaller: LineBuffer = ["only"].into_iter().collect();
        writer.write(&smaller, &base).unwrap();

        let text = fs::read_to_string(with_suffix(&base, ".txt")).unwrap();
        assert_eq!(text, "only");
    }

    #[test]
    fn test_empty_buffer_writes_empty_text() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("empty");

        let written = OutputWriter::default().write(&LineBuffer::new(), &base).unwrap();
        assert_eq!(written, 0);
        assert_eq!(fs::read_to_string(with_suffix(&base, ".txt")).unwrap(), "");
        assert!(with_suffix(&base, ".docx").exists());
    }

    #[test]
    fn test_document_failure_keeps_text() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("partial");
        fs::create_dir(with_suffix(&base, ".docx")).unwrap();

        let result = OutputWriter::default().write(&sample_buffer(), &base);

        match result {
            Err(ListingError::OutputWrite { path, .. }) => {
                assert_eq!(path, with_suffix(&base, ".docx"))
            }
            other => panic!("expected OutputWrite, got {:?}", other),
        }
        assert!(with_suffix(&base, ".txt").is_file());
    }

    #[test]
    fn test_unwritable_destination() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let result = OutputWriter::default().write(&sample_buffer(), &blocker.join("listing"));
        assert!(matches!(result, Err(ListingError::OutputWrite { .. })));
    }
}
