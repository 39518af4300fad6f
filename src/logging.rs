// ABOUTME: Tracing setup for the clawpost binary.
// ABOUTME: RUST_LOG wins when set; otherwise info, or debug with --verbose.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber, writing to stderr.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("clawpost=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
