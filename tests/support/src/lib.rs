//! test-support: helpers for robust, nextest-friendly tests.
//!
//! Add as a dev-dependency in your top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support" }
//! ```
//!
//! Then in tests:
//! ```rust
//! use test_support::{init_tracing, read_fixture_text};
//!
//! #[test]
//! fn example() {
//!     init_tracing();
//!     let _body = read_fixture_text("success_response.json");
//! }
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};

/// Env vars the report binary reads; cleared from every child process we spawn.
pub const REPORT_ENV_VARS: &[&str] = &[
    "DD_API_KEY",
    "DD_APP_KEY",
    "DD_SITE",
    "RUST_LOG",
    "PAYFLOW_TEST_SUCCESS_JSON",
    "PAYFLOW_TEST_FAILURE_JSON",
];

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Initialize insta snapshot settings once per test process.
///
/// - Omits `Expression:` in snapshot headers for cleaner diffs
pub fn init_insta() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let mut settings = insta::Settings::clone_current();
        settings.set_omit_expression(true);
        // Bind settings to the thread for the remainder of the test process by leaking the guard
        let guard = settings.bind_to_scope();
        std::mem::forget(guard);
    });
    Lazy::force(&INIT);
}

/// Return the path to the repository's `tests/fixtures` directory.
///
/// `CARGO_MANIFEST_DIR` here is `tests/support`, so its parent is `tests`.
pub fn fixtures_dir() -> PathBuf {
    let support = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    support
        .parent()
        .map(|tests| tests.join("fixtures"))
        .unwrap_or_else(|| support.join("fixtures"))
}

/// Read a UTF-8 text fixture into a string.
pub fn read_fixture_text<P: AsRef<Path>>(rel_path: P) -> String {
    let path = fixtures_dir().join(rel_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Run a binary target with `assert_cmd` in a clean environment: every variable
/// in [`REPORT_ENV_VARS`] is removed so the host's credentials never leak in.
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
    init_tracing();
    let mut cmd = assert_cmd::Command::cargo_bin(bin).expect("binary target not found");
    for k in REPORT_ENV_VARS {
        cmd.env_remove(k);
    }
    cmd
}
