//! Log setup shared by the server binary and the test suites.
//!
//! stdout is the MCP JSON-RPC channel and must carry protocol frames only, so
//! every log line goes to stderr, or to libtest's capture when under a test
//! runner. The filter comes from `DOCFIND_LOG` (same syntax as `RUST_LOG`).

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const FILTER_VAR: &str = "DOCFIND_LOG";

static INIT: Once = Once::new();

fn under_test_runner() -> bool {
    std::env::var_os("NEXTEST").is_some() || std::env::var_os("CARGO_TARGET_TMPDIR").is_some()
}

/// Directives used when `DOCFIND_LOG` is unset or unparsable.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "docfind_mcp=debug,info"
    } else {
        "docfind_mcp=info,warn"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(FILTER_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Install the global subscriber once. Later calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        let verbose = under_test_runner();
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter(verbose))
            .with_ansi(false)
            .with_target(true)
            .compact();

        if verbose {
            // Several test binaries may race here; the loser keeps the winner's subscriber.
            let _ = builder.with_test_writer().try_init();
        } else if let Err(e) = builder.with_writer(std::io::stderr).try_init() {
            eprintln!("docfind-mcp: logging disabled: {e}");
        }
    });
}
