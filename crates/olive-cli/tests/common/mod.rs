//! Shared test harness for olive CLI integration tests.
//!
//! Runs the built binary with a pinned environment so layout overrides from
//! the caller's shell never leak into a test.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Path to the compiled `olive` binary.
pub fn olive_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_olive"))
}

/// Run `olive` in `dir` with `args` and extra environment variables.
pub fn olive_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> CommandResult {
    let mut cmd = Command::new(olive_bin());
    cmd.args(args)
        .current_dir(dir)
        .env_remove("OLIVE_MAX_COUNT")
        .env_remove("OLIVE_BROKEN_LINE_LENGTH")
        .env_remove("OLIVE_COLOR_SCHEME")
        .env_remove("RUST_LOG");
    for (k, v) in env {
        cmd.env(k, v);
    }
    let output = cmd.output().expect("failed to run olive");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

pub fn olive(dir: &Path, args: &[&str]) -> CommandResult {
    olive_env(dir, args, &[])
}

/// Write an ancestry file into `dir` and return its name.
pub fn write_history(dir: &Path, name: &str, content: &str) -> String {
    std::fs::write(dir.join(name), content).expect("failed to write history");
    name.to_string()
}

/// `r4` merges `r3` into the mainline `r1 <- r2 <- r4`.
pub const MERGE: &str = "\
# merge of a side line
commit r4
parent r2
parent r3
committer ann
timestamp 100 3600
message Merge r3

commit r3
parent r1
committer bob
message side

commit r2
parent r1

commit r1
";

/// Two heads on one root, never merged.
pub const FORK: &str = "\
commit r2
parent r1

commit r3
parent r1

commit r1
";

/// `b` names a parent that has no record.
pub const GHOST: &str = "\
commit b
parent a
parent gone

commit a
";
