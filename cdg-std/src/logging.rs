//! Log output for binaries built on this crate.
//!
//! Everything goes through `tracing`. Per instruction render events live on
//! the `cdg_render` target at TRACE level, enable them with
//! `--log cdg_render=trace` or `RUST_LOG=cdg_render=trace`.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info";

/// Builds the filter from `directives`, then `RUST_LOG`, then `info`.
#[must_use]
pub fn filter(directives: Option<&str>) -> EnvFilter {
    directives.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES)),
        EnvFilter::new,
    )
}

/// Installs a global fmt subscriber writing to stderr.
///
/// Does nothing if a global subscriber is already set.
pub fn init(directives: Option<&str>) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter(directives))
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = result {
        tracing::debug!(%err, "logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_directives_win() {
        let filter = filter(Some("cdg_render=trace"));
        assert_eq!(filter.to_string(), "cdg_render=trace");
    }

    #[test]
    fn test_init_twice() {
        init(Some("warn"));
        init(Some("debug"));
    }
}
