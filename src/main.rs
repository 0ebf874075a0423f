use clap::Parser;
use codelisting::{
    logging, Cli, CodeListing, Config, ListingError, OutputFormatter, UserFriendlyError,
};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    if cli.directories.is_empty() && cli.preview.is_none() {
        let formatter = OutputFormatter::new(cli.output_mode(), 0, false);
        formatter.error("No project directory given");
        eprintln!("Usage: codelisting <DIRECTORY>... --ext <EXTENSIONS>");
        return 2;
    }

    let mut listing = match CodeListing::from_cli(&cli) {
        Ok(listing) => listing,
        Err(e) => {
            print_startup_error(&cli, &e);
            return exit_code(&e);
        }
    };

    let result = if let Some(ref path) = cli.preview {
        listing.preview(path).map(|_| ())
    } else if cli.list {
        listing.list().map(|_| ())
    } else if cli.dry_run {
        listing.dry_run().map(|_| ())
    } else {
        listing.generate().await.map(|_| ())
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            listing.handle_error(&e);
            exit_code(&e)
        }
    }
}

/// Process exit status for each error kind.
fn exit_code(error: &ListingError) -> i32 {
    match error {
        ListingError::Cancelled => 130, // Interrupted (SIGINT)
        ListingError::Config { .. } | ListingError::InvalidExtension { .. } => 2,
        ListingError::NotFound { .. }
        | ListingError::FileNotFound { .. }
        | ListingError::NoSuchSelection { .. } => 3,
        ListingError::DuplicateEntry { .. } => 4,
        ListingError::EmptyFilter => 5,
        ListingError::Busy => 6,
        ListingError::FileRead { .. } => 7,
        ListingError::OutputWrite { .. } => 8,
        ListingError::UnsupportedPreview { .. } => 9,
        ListingError::Io(_) => 1,
    }
}

/// Write the sample to `--config` when given, otherwise print it.
fn handle_generate_config(cli: &Cli) -> i32 {
    let Some(ref config_path) = cli.config else {
        print!("{}", Config::create_sample_config());
        return 0;
    };

    match CodeListing::generate_sample_config(config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!(
                "  codelisting <directory> --config {}",
                config_path.display()
            );
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            exit_code(&e)
        }
    }
}

fn print_startup_error(cli: &Cli, error: &ListingError) {
    let formatter = OutputFormatter::new(cli.output_mode(), 0, false);
    formatter.print_user_friendly_error(error);
}
