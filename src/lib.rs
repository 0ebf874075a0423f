pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod pipeline;
pub mod preview;
pub mod scanner;
pub mod ui;
pub mod workspace;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, FilterConfig, OutputConfig, PreviewConfig};
pub use error::{EntryKind, ListingError, Result, UserFriendlyError};

// Core functionality re-exports
pub use job::{CancelFlag, JobController, JobEvent, JobHandle, JobState, RunSummary};
pub use pipeline::{aggregate, ArtifactPaths, DocumentPreset, LineBuffer, OutputWriter};
pub use preview::{Preview, PreviewKind};
pub use scanner::{DirectoryScanner, Enumeration, FileRecord, FilterSet};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};
pub use workspace::{DirectoryEntry, Workspace};

use std::path::{Path, PathBuf};

/// Main library interface: a workspace plus the controller that runs listings
/// for its selected directory.
pub struct CodeListing {
    config: Config,
    workspace: Workspace,
    controller: JobController,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl CodeListing {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        Self::with_shutdown(config, output_mode, verbose, quiet, GracefulShutdown::new()?)
    }

    /// Build an instance around an existing shutdown handle. Used by tests and
    /// embedders that install their own signal handling.
    pub fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Result<Self> {
        let mut workspace = Workspace::new();
        for extension in &config.filters.extensions {
            workspace.add_extension(extension)?;
        }

        let controller = JobController::new(config.filters.clone(), config.output.document_preset());
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Ok(Self {
            config,
            workspace,
            controller,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            progress_manager,
            shutdown,
        })
    }

    /// Create an instance from CLI arguments: config file, overrides, tracked
    /// directories, extra extensions and the selection.
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let shutdown = GracefulShutdown::default();
        let mut listing = Self::with_shutdown(
            config,
            cli_args.output_mode(),
            cli_args.verbose,
            cli_args.quiet,
            shutdown,
        )?;
        listing.apply_cli_selection(cli_args)?;
        Ok(listing)
    }

    fn apply_cli_selection(&mut self, cli_args: &Cli) -> Result<()> {
        for directory in &cli_args.directories {
            let entry = self.workspace.add_directory(directory)?;
            tracing::debug!(name = %entry.name, "Tracking directory");
        }

        for extension in &cli_args.extensions {
            self.workspace.add_extension(extension)?;
        }

        if let Some(ref selector) = cli_args.select {
            self.workspace.select(selector)?;
        }

        Ok(())
    }

    /// Run one listing for the selected directory, showing progress.
    pub async fn generate(&self) -> Result<RunSummary> {
        self.shutdown.check_shutdown()?;

        let root = self.selected_root()?;
        let base = self.destination_base();

        self.output_formatter
            .start_operation(&format!("Generating listing for {}", root.display()));

        let handle = self.controller.start(&root, self.workspace.filters(), &base)?;
        self.shutdown.watch(handle.cancel_flag());

        let run_progress = self.progress_manager.create_run_progress();
        let result = {
            let pb = run_progress.clone();
            handle
                .wait(move |percent| ui::progress::update_run_progress(&pb, percent))
                .await
        };
        self.shutdown.unwatch();

        match result {
            Ok(summary) => {
                ui::progress::finish_progress_with_summary(
                    &run_progress,
                    &format!("Collected {} lines", summary.lines_written),
                    summary.elapsed,
                );
                self.progress_manager.clear();
                if summary.qualifying_files == 0 {
                    self.output_formatter.warning(&format!(
                        "No files matched {}; empty listing files were written",
                        self.workspace.filters().to_vec().join(", ")
                    ));
                }
                self.output_formatter.print_run_summary(&summary);
                Ok(summary)
            }
            Err(e) => {
                run_progress.abandon();
                self.progress_manager.clear();
                Err(e)
            }
        }
    }

    /// Enumerate the selected directory and print every file, marking the
    /// ones the extension filter selects.
    pub fn list(&mut self) -> Result<&Enumeration> {
        self.output_formatter
            .print_directories(self.workspace.directories(), self.workspace.selected());

        let scanner = DirectoryScanner::new(&self.config.filters);
        let spinner = self.progress_manager.create_spinner("Scanning directory...");
        let result = self.workspace.refresh_listing(&scanner);
        spinner.finish_and_clear();

        let enumeration = result?;
        self.output_formatter.print_listing(enumeration);
        Ok(enumeration)
    }

    /// Show what a run would collect and where it would write, without
    /// reading or writing any file contents.
    pub fn dry_run(&mut self) -> Result<Enumeration> {
        if self.workspace.filters().is_empty() {
            return Err(ListingError::EmptyFilter);
        }

        let base = self.destination_base();
        let scanner = DirectoryScanner::new(&self.config.filters);
        let enumeration = self.workspace.refresh_listing(&scanner)?.clone();

        let formatter = &self.output_formatter;
        formatter.info("DRY RUN MODE - No files will be written");
        formatter.print_header("Listing plan");
        if formatter.mode() != OutputMode::Json {
            println!("  Directory:  {}", enumeration.root.display());
            println!(
                "  Extensions: {}",
                self.workspace.filters().to_vec().join(", ")
            );
            println!("  Recursive:  {}", self.config.filters.recursive);
            for record in &enumeration.qualifying {
                println!("    {}", record.display_path());
            }
            let artifacts = ArtifactPaths::for_base(&base);
            println!("  Text file:  {}", artifacts.text.display());
            println!("  Document:   {}", artifacts.document.display());
        }
        formatter.debug(&enumeration.statistics().display_summary());
        formatter.success(&format!(
            "{} of {} files would be collected",
            enumeration.qualifying.len(),
            enumeration.all_files.len()
        ));

        Ok(enumeration)
    }

    /// Preview one file: images go to the system viewer, text is printed.
    pub fn preview(&self, path: &Path) -> Result<Preview> {
        let preview = preview::load_preview(path, &self.config.preview)?;
        match preview {
            Preview::Image(ref image) => {
                preview::open_in_viewer(image)?;
                self.output_formatter
                    .success(&format!("Opened {} in the image viewer", image.display()));
            }
            Preview::Text(ref content) => self.output_formatter.print_text_preview(path, content),
        }
        Ok(preview)
    }

    /// Where the `.txt` and `.docx` files go, without extensions.
    pub fn destination_base(&self) -> PathBuf {
        self.config.output.resolve_base_path()
    }

    fn selected_root(&self) -> Result<PathBuf> {
        self.workspace
            .selected()
            .map(|entry| entry.full_path.clone())
            .ok_or_else(|| ListingError::NoSuchSelection {
                selector: "no directory selected".to_string(),
            })
    }

    /// Write a sample configuration file.
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn controller(&self) -> &JobController {
        &self.controller
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &ListingError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Run one listing with default settings and no terminal output.
///
/// `extensions` are added through the same normalization the CLI uses.
pub async fn generate_listing<I, S>(root: &Path, extensions: I, base: &Path) -> Result<RunSummary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let filters = FilterSet::from_inputs(extensions)?;
    let controller = JobController::new(FilterConfig::default(), DocumentPreset::default());
    controller.start(root, &filters, base)?.wait(|_| {}).await
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        target: std::env::consts::ARCH.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_date: &'static str,
    pub target: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "codelisting {} ({}) built on {} for {}",
            self.version, self.git_hash, self.build_date, self.target
        )
    }
}
