use crate::config::PreviewConfig;
use crate::error::{ListingError, Result};
use crate::scanner::extension_of;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Handed to the system image viewer.
    Image(PathBuf),
    Text(String),
}

/// Decide how `path` can be shown, by exact extension membership.
pub fn classify(path: &Path, config: &PreviewConfig) -> Result<PreviewKind> {
    let extension = extension_of(path);
    let listed = |set: &[String]| !extension.is_empty() && set.iter().any(|e| e == &extension);

    if listed(&config.image_extensions) {
        Ok(PreviewKind::Image)
    } else if listed(&config.text_extensions) {
        Ok(PreviewKind::Text)
    } else {
        Err(ListingError::UnsupportedPreview {
            path: path.display().to_string(),
        })
    }
}

/// Load a preview of `path`. Images are not read, only located.
pub fn load_preview(path: &Path, config: &PreviewConfig) -> Result<Preview> {
    if !path.is_file() {
        return Err(ListingError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match classify(path, config)? {
        PreviewKind::Image => Ok(Preview::Image(path.to_path_buf())),
        PreviewKind::Text => {
            let content = fs::read_to_string(path).map_err(|source| ListingError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Preview::Text(content))
        }
    }
}

pub fn open_in_viewer(path: &Path) -> Result<()> {
    tracing::debug!(path = %path.display(), "Opening image viewer");
    open::that(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_classify() {
        let config = PreviewConfig::default();

        assert_eq!(classify(Path::new("logo.png"), &config).unwrap(), PreviewKind::Image);
        assert_eq!(classify(Path::new("Main.cs"), &config).unwrap(), PreviewKind::Text);
        assert!(matches!(
            classify(Path::new("app.exe"), &config),
            Err(ListingError::UnsupportedPreview { .. })
        ));
        assert!(classify(Path::new("Makefile"), &config).is_err());
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let config = PreviewConfig::default();
        assert!(classify(Path::new("LOGO.PNG"), &config).is_err());
    }

    #[test]
    fn test_custom_text_set() {
        let config = PreviewConfig {
            image_extensions: vec![],
            text_extensions: vec![".log".to_string()],
        };
        assert_eq!(classify(Path::new("run.log"), &config).unwrap(), PreviewKind::Text);
        assert!(classify(Path::new("logo.png"), &config).is_err());
    }

    #[test]
    fn test_load_text_preview() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Main.cs");
        fs::write(&path, "class Main {}\n").unwrap();

        let preview = load_preview(&path, &PreviewConfig::default()).unwrap();
        assert_eq!(preview, Preview::Text("class Main {}\n".to_string()));
    }

    #[test]
    fn test_load_image_preview_does_not_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logo.png");
        fs::write(&path, [0x89u8, 0x50, 0x4e, 0x47]).unwrap();

        let preview = load_preview(&path, &PreviewConfig::default()).unwrap();
        assert_eq!(preview, Preview::Image(path));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_preview(Path::new("/no/such/file.cs"), &PreviewConfig::default());
        assert!(matches!(result, Err(ListingError::FileNotFound { .. })));
    }
}
