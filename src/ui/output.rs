use crate::error::{ListingError, UserFriendlyError};
use crate::job::RunSummary;
use crate::scanner::Enumeration;
use crate::ui::progress::format_duration;
use crate::workspace::DirectoryEntry;
use console::{style, Emoji, Term};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl OutputMode {
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputMode::Json,
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        }
    }
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static PAGE: Emoji = Emoji("📄 ", "- ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &ListingError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!("{}{}", INFO, style(format!("Suggestion: {}", suggestion)).cyan());
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    /// Final report of a successful run. The effective line count is always
    /// printed, even in quiet mode.
    pub fn print_run_summary(&self, summary: &RunSummary) {
        match self.mode {
            OutputMode::Human => self.print_human_summary(summary),
            OutputMode::Json => self.print_json_value("summary", summary),
            OutputMode::Plain => {
                if self.quiet {
                    println!("{}", summary.lines_written);
                    return;
                }
                println!("COMPLETED: {}", summary.root.display());
                println!("Lines: {}", summary.lines_written);
                println!("Qualifying files: {}", summary.qualifying_files);
                println!("Total files: {}", summary.total_files);
                println!("Text: {}", summary.artifacts.text.display());
                println!("Document: {}", summary.artifacts.document.display());
                println!("Duration: {:?}", summary.elapsed);
            }
        }
    }

    /// Full file listing of one directory, with qualifying files marked.
    pub fn print_listing(&self, enumeration: &Enumeration) {
        match self.mode {
            OutputMode::Json => self.print_json_value("listing", enumeration),
            OutputMode::Plain => {
                for (record, qualifies) in enumeration.marked_files() {
                    let marker = if qualifies { "*" } else { " " };
                    println!("{} {}", marker, record.display_path());
                }
            }
            OutputMode::Human => {
                self.print_header(&format!("Files in {}", enumeration.root.display()));
                for (record, qualifies) in enumeration.marked_files() {
                    let path = record.display_path();
                    if qualifies {
                        if self.use_colors {
                            println!("{}{}", PAGE, style(path).green());
                        } else {
                            println!("* {}", path);
                        }
                    } else if self.use_colors {
                        println!("   {}", style(path).dim());
                    } else {
                        println!("  {}", path);
                    }
                }
                println!();
                println!(
                    "{} of {} files match the extension filter",
                    enumeration.qualifying.len(),
                    enumeration.all_files.len()
                );
            }
        }
    }

    pub fn print_directories(&self, directories: &[DirectoryEntry], selected: Option<&DirectoryEntry>) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Json => self.print_json_value("directories", &directories),
            _ => {
                for (index, entry) in directories.iter().enumerate() {
                    let marker = if Some(entry) == selected { ">" } else { " " };
                    println!("{} {}. {} ({})", marker, index + 1, entry.name, entry.full_path.display());
                }
            }
        }
    }

    /// Raw file content for text previews; never decorated.
    pub fn print_text_preview(&self, path: &std::path::Path, content: &str) {
        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "preview",
                "path": path.display().to_string(),
                "content": content
            })),
            _ => print!("{}", content),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}", style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => println!("=== {} ===", title),
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            let (emoji, styled) = match msg_type {
                MessageType::Success => (&CHECKMARK, style(message).green().bold()),
                MessageType::Error => (&CROSS, style(message).red().bold()),
                MessageType::Warning => (&WARNING, style(message).yellow().bold()),
                MessageType::Info => (&INFO, style(message).cyan()),
            };
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, styled),
                _ => println!("{}{}", emoji, styled),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };
            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_human_summary(&self, summary: &RunSummary) {
        if self.quiet {
            println!("{}", summary.lines_written);
            return;
        }

        println!();
        if self.use_colors {
            println!("{}{}", CHECKMARK, style("Source listing generated").green().bold());
        } else {
            println!("✓ Source listing generated");
        }
        println!();

        let value = |v: String| {
            if self.use_colors {
                style(v).cyan().bold().to_string()
            } else {
                v
            }
        };
        println!("  Effective lines:  {}", value(summary.lines_written.to_string()));
        println!(
            "  Files:            {} of {}",
            value(summary.qualifying_files.to_string()),
            summary.total_files
        );
        println!("  Text file:        {}", summary.artifacts.text.display());
        println!("  Document:         {}", summary.artifacts.document.display());
        println!("  Time taken:       {}", format_duration(summary.elapsed));
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_value<T: Serialize + ?Sized>(&self, kind: &str, value: &T) {
        self.print_json_object(&serde_json::json!({
            "type": kind,
            "data": value
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}
