pub mod config;
pub mod pipeline;
pub mod presets;
pub mod vision;

use tracing_subscriber::EnvFilter;

/// Initialize tracing on stderr so stdout carries only the prompt.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
