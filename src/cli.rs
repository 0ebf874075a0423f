use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codelisting")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate printable source code listings (.txt and .docx)")]
#[command(
    long_about = "codelisting walks a project directory, collects every non-blank line of the \
                  files whose extensions you select, and writes them as a plain-text file and a \
                  compact Word document, ready for printing or registration submissions."
)]
#[command(after_help = "EXAMPLES:\n  \
    codelisting ./MyApp --ext cs,xaml\n  \
    codelisting ./server ./client --select 1 --ext rs -o listings/server\n  \
    codelisting ./MyApp --ext cs --list\n  \
    codelisting ./MyApp --preview ./MyApp/Assets/logo.png\n  \
    codelisting --generate-config > codelisting.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Project directories to track; the last one is processed unless --select says otherwise
    pub directories: Vec<PathBuf>,

    /// Source file extensions (comma-separated, repeatable)
    #[arg(short, long = "ext", value_delimiter = ',', help = "File extensions that count as source code (e.g., cs,xaml or .rs)")]
    pub extensions: Vec<String>,

    /// Output base path; `.txt` and `.docx` are appended
    #[arg(short, long, help = "Base path of the generated files (defaults to the desktop)")]
    pub output: Option<PathBuf>,

    /// File name used when no --output is given
    #[arg(long)]
    pub output_name: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Directory to process, by 1-based position, name or path
    #[arg(long)]
    pub select: Option<String>,

    /// Print the file listing of the selected directory instead of generating
    #[arg(long, conflicts_with = "preview")]
    pub list: bool,

    /// Preview a file: images open in the system viewer, text is printed
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Only look at files directly inside the selected directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Maximum directory depth to descend
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Document font family
    #[arg(long)]
    pub font_family: Option<String>,

    /// Document font size in points
    #[arg(long, value_parser = parse_font_size)]
    pub font_size: Option<f32>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only the line count and errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show what would be processed without writing anything
    #[arg(long, help = "Show the files that would be collected without writing the listing")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Print a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let base_path = self.output.as_ref().map(|o| {
            if o.is_absolute() {
                o.clone()
            } else {
                std::env::current_dir().unwrap_or_default().join(o)
            }
        });

        CliOverrides::new()
            .with_no_recursive(self.no_recursive)
            .with_max_depth(self.max_depth)
            .with_base_path(base_path)
            .with_output_name(self.output_name.clone())
            .with_font_family(self.font_family.clone())
            .with_font_size(self.font_size)
    }

    pub fn output_mode(&self) -> OutputMode {
        match self.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub fn parse_font_size(s: &str) -> std::result::Result<f32, String> {
    let size: f32 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid font size: {}", s))?;

    if !size.is_finite() || size <= 0.0 {
        return Err("Font size must be a positive number of points".to_string());
    }
    if size > 1638.0 {
        return Err("Font size must be at most 1638 points".to_string());
    }

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            directories: vec![PathBuf::from("./project")],
            extensions: vec![],
            output: None,
            output_name: None,
            config: None,
            select: None,
            list: false,
            preview: None,
            no_recursive: false,
            max_depth: None,
            font_family: None,
            font_size: None,
            output_format: OutputFormat::Human,
            verbose: 0,
            quiet: false,
            dry_run: false,
            generate_config: false,
        }
    }

    #[test]
    fn test_extensions_are_comma_separated_and_repeatable() {
        let cli = Cli::try_parse_from(["codelisting", "./app", "-e", "cs,xaml", "--ext", ".axaml"]).unwrap();
        assert_eq!(cli.extensions, vec!["cs", "xaml", ".axaml"]);
        assert_eq!(cli.directories, vec![PathBuf::from("./app")]);
    }

    #[test]
    fn test_multiple_directories() {
        let cli = Cli::try_parse_from(["codelisting", "a", "b", "--select", "1"]).unwrap();
        assert_eq!(cli.directories.len(), 2);
        assert_eq!(cli.select.as_deref(), Some("1"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["codelisting", "a", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_parse_font_size() {
        assert_eq!(parse_font_size("7").unwrap(), 7.0);
        assert_eq!(parse_font_size("10.5").unwrap(), 10.5);
        assert!(parse_font_size("0").is_err());
        assert!(parse_font_size("-3").is_err());
        assert!(parse_font_size("big").is_err());
        assert!(parse_font_size("NaN").is_err());
    }

    #[test]
    fn test_overrides_resolve_relative_output() {
        let mut cli = base_cli();
        cli.output = Some(PathBuf::from("listings/app"));
        cli.no_recursive = true;
        cli.font_size = Some(9.0);

        let overrides = cli.create_cli_overrides();
        let base = overrides.base_path.unwrap();
        assert!(base.is_absolute());
        assert!(base.ends_with("listings/app"));
        assert!(overrides.no_recursive);
        assert_eq!(overrides.font_size, Some(9.0));
    }

    #[test]
    fn test_verbosity_level() {
        let mut cli = base_cli();
        cli.verbose = 2;
        assert_eq!(cli.verbosity_level(), 2);
        assert!(cli.is_verbose());

        cli.quiet = true;
        assert_eq!(cli.verbosity_level(), 0);
        assert!(!cli.is_verbose());
    }

    #[test]
    fn test_output_mode_mapping() {
        let mut cli = base_cli();
        cli.output_format = OutputFormat::Json;
        assert_eq!(cli.output_mode(), OutputMode::Json);
    }
}
