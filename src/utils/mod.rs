pub mod build_info;
pub mod persistence;

use std::sync::Once;

const DEFAULT_DIRECTIVE: &str = "recurring_budget=info";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber and logs the build metadata once.
///
/// `RUST_LOG` wins over `filter`; with neither set the crate logs at `info`.
pub fn init_tracing(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(filter.unwrap_or(DEFAULT_DIRECTIVE)))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        // A host application may already own the global subscriber.
        let _ = fmt().with_env_filter(filter).try_init();

        let build = build_info::current();
        tracing::info!(
            version = build.version,
            git = build.git_hash,
            profile = build.profile,
            "Recurring Budget tracing initialized."
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_a_no_op() {
        init_tracing(Some("recurring_budget=debug"));
        init_tracing(None);
        assert!(TRACING_INIT.is_completed());
    }
}
