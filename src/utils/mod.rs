pub mod build_info;
pub mod paths;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "demonstrativo_core=info";

/// Initializes the global tracing subscriber. `RUST_LOG` directives are merged
/// on top of the crate default.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::filter::{Directive, LevelFilter};
        use tracing_subscriber::{fmt, EnvFilter};

        let directive = DEFAULT_DIRECTIVE
            .parse::<Directive>()
            .unwrap_or_else(|_| LevelFilter::INFO.into());
        let filter = EnvFilter::from_default_env().add_directive(directive);

        // Logs go to stderr so script output on stdout stays clean.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
