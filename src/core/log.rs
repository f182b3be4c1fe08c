use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber on stderr.
///
/// By default only warnings from this crate are shown, one line each, so
/// dropped expenses and fallback rates are visible next to the report.
/// `verbose` raises the level to debug with multi-line events. `RUST_LOG`
/// replaces either default.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let compact = (!verbose).then(|| {
        fmt::layer()
            .compact()
            .without_time()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    let pretty = verbose.then(|| fmt::layer().pretty().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(pretty)
        .init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "xpense=debug" } else { "xpense=warn" }
}
