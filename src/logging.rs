use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the CLI verbosity flags.
///
/// Quiet wins over verbose. `RUST_LOG`, when set, replaces the result.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }

    match verbose {
        0 => "warn",
        1 => "codelisting=info,warn",
        2 => "codelisting=debug,info",
        _ => "trace",
    }
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// listing or JSON output on stdout.
pub fn init_logging(verbose: u8, quiet: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose >= 2),
        )
        .try_init();

    // Only fails when a subscriber is already installed, e.g. under tests.
    if result.is_ok() {
        tracing::debug!(verbose, quiet, "Logging initialized");
    }
}
