//! IR fixtures shipped with the crate
//!
//! Each fixture is a benchmark-style program: allocations go to a temporary,
//! run the constructor, then get copied into the named local.

use flowpta::Program;
use std::path::PathBuf;

/// Fixtures under `fixtures/` with the result each one must produce
pub const SCENARIOS: &[(&str, &[(i64, &[i64])])] = &[
    ("order", &[(1, &[1]), (2, &[2])]),
    ("no_context_field", &[(1, &[1])]),
    ("field", &[(1, &[1]), (2, &[2])]),
    ("no_field_context", &[(1, &[2])]),
    ("multi_ret", &[(1, &[1, 2])]),
];

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(format!("{name}.json"))
}

pub fn load_fixture(name: &str) -> Program {
    Program::from_json_file(fixture_path(name))
        .unwrap_or_else(|e| panic!("fixture {name} failed to load: {e}"))
}
