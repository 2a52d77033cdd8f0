pub mod render;
pub mod session;

use std::path::Path;

use anyhow::Context;
use tawi_core::TEMPLATE_CONTENT;

pub use session::SessionStore;

/// Write the bulk recharge template. Works offline and without a session.
pub fn write_template(path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, TEMPLATE_CONTENT)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays clean
/// for tables and JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
