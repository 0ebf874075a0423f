use crate::error::{ListingError, Result};
use crate::pipeline::DocumentPreset;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_NAME: &str = "source-code-listing";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub filters: FilterConfig,
    pub output: OutputConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub extensions: Vec<String>,
    pub recursive: bool,
    pub max_depth: usize,
    pub exclude_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<PathBuf>,
    pub output_name: String,
    pub font_family: String,
    pub font_size: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub image_extensions: Vec<String>,
    pub text_extensions: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            // Nothing counts as source code until the user says so.
            extensions: Vec::new(),
            recursive: true,
            max_depth: 64,
            exclude_dirs: vec![
                ".git".to_string(),
                ".svn".to_string(),
                ".hg".to_string(),
                ".vs".to_string(),
                ".idea".to_string(),
                "node_modules".to_string(),
            ],
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        let preset = DocumentPreset::default();
        Self {
            base_path: None,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            font_family: preset.font_family,
            font_size: preset.font_size,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        let to_strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            image_extensions: to_strings(&[
                ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".webp", ".ico",
            ]),
            text_extensions: to_strings(&[
                ".txt", ".md", ".cs", ".xaml", ".axaml", ".rs", ".toml", ".json", ".xml",
                ".yaml", ".yml", ".c", ".h", ".cpp", ".hpp", ".java", ".kt", ".py", ".js",
                ".ts", ".go", ".html", ".css", ".sql", ".sh",
            ]),
        }
    }
}

impl OutputConfig {
    /// Base path shared by the `.txt` and `.docx` artifacts.
    ///
    /// An explicit `base_path` wins; otherwise the listing lands on the
    /// user's desktop (home directory, then working directory, as fallbacks).
    pub fn resolve_base_path(&self) -> PathBuf {
        if let Some(ref base) = self.base_path {
            return base.clone();
        }

        let root = dirs::desktop_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        root.join(&self.output_name)
    }

    pub fn document_preset(&self) -> DocumentPreset {
        DocumentPreset {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ListingError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ListingError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ListingError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["codelisting.toml", ".codelisting.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        tracing::debug!("Using configuration file {}", default_path);
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if cli_args.no_recursive {
            self.filters.recursive = false;
        }

        if let Some(max_depth) = cli_args.max_depth {
            self.filters.max_depth = max_depth;
        }

        if let Some(ref base_path) = cli_args.base_path {
            self.output.base_path = Some(base_path.clone());
        }

        if let Some(ref output_name) = cli_args.output_name {
            self.output.output_name = output_name.clone();
        }

        if let Some(ref font_family) = cli_args.font_family {
            self.output.font_family = font_family.clone();
        }

        if let Some(font_size) = cli_args.font_size {
            self.output.font_size = font_size;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ListingError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ListingError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.filters.max_depth == 0 {
            return Err(ListingError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        for pattern in &self.filters.exclude_patterns {
            Regex::new(pattern).map_err(|e| ListingError::Config {
                message: format!("Invalid exclude pattern '{}': {}", pattern, e),
            })?;
        }

        if !(self.output.font_size > 0.0 && self.output.font_size <= 1638.0) {
            return Err(ListingError::Config {
                message: format!(
                    "Font size must be between 0 and 1638 points, got {}",
                    self.output.font_size
                ),
            });
        }

        if self.output.font_family.trim().is_empty() {
            return Err(ListingError::Config {
                message: "Font family must not be empty".to_string(),
            });
        }

        if self.output.base_path.is_none() && self.output.output_name.trim().is_empty() {
            return Err(ListingError::Config {
                message: "Output name must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let mut sample_config = Self::default();
        sample_config.filters.extensions = vec![".rs".to_string(), ".toml".to_string()];
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub no_recursive: bool,
    pub max_depth: Option<usize>,
    pub base_path: Option<PathBuf>,
    pub output_name: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_no_recursive(mut self, no_recursive: bool) -> Self {
        self.no_recursive = no_recursive;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_base_path(mut self, base_path: Option<PathBuf>) -> Self {
        self.base_path = base_path;
        self
    }

    pub fn with_output_name(mut self, output_name: Option<String>) -> Self {
        self.output_name = output_name;
        self
    }

    pub fn with_font_family(mut self, font_family: Option<String>) -> Self {
        self.font_family = font_family;
        self
    }

    pub fn with_font_size(mut self, font_size: Option<f32>) -> Self {
        self.font_size = font_size;
        self
    }
}
