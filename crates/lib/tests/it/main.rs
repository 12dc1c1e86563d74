/*! Integration tests for Waymark.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - namespace: Structural operations (insert, delete, rename, move, transform)
 * - shift: Line shifting on document edits and re-anchoring
 * - persist: The JSON namespace document
 * - registry: Multiple namespaces, cross-namespace moves and mutation hooks
 * - properties: Randomized operation sequences checked against the invariants
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("waymark=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod helpers;
mod namespace;
mod shift;
