//! Observability utilities for the policy editor.

#![warn(missing_docs, clippy::pedantic)]

use tracing_subscriber::EnvFilter;

/// Filter directive applied when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Installs a formatted `tracing` subscriber filtered by `RUST_LOG`, falling
/// back to `default_directive`.
///
/// Returns `false` when a global subscriber was already installed; the
/// existing one is kept.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let _ = init_tracing("debug");
        assert!(!init_tracing("not a directive ["));
    }
}
