//! Shared test setup for the unravel crates.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test-friendly tracing subscriber, once per process.
///
/// Output is filtered by `RUST_LOG` and captured by the test harness, so
/// `RUST_LOG=unravel_parse=trace cargo test` shows every unravel step of a
/// failing test.
pub fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Split an annotated source into the source and the caret's offset.
///
/// The first line is the source; the second line marks one character with
/// `^`. Offsets count characters.
///
/// ```text
/// a,b "q"
///     ^
/// ```
pub fn caret(annotated: &str) -> (String, usize) {
    let mut lines = annotated.lines();
    let source = lines.next().unwrap_or_default().to_string();
    let marker = lines
        .next()
        .and_then(|line| line.chars().position(|c| c == '^'))
        .unwrap_or_else(|| panic!("annotation has no caret line:\n{annotated}"));
    (source, marker)
}
