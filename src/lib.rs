//! Workspace root package. It only carries the pre-commit hook
//! configuration; the route engine lives in `crates/saferoute-lib` and the
//! command-line tool in `crates/saferoute-cli`.
