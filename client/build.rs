//! Stamps `marathonctl --version` with the source revision and build time

use std::process::Command;

use chrono::{SecondsFormat, Utc};

/// Trimmed stdout of a successful `git` invocation
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    let revision =
        git(&["describe", "--always", "--dirty", "--abbrev=10"]).unwrap_or_else(|| "unknown".into());
    let built_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    for (key, value) in [("GIT_HASH", revision), ("BUILD_TIME", built_at)] {
        println!("cargo:rustc-env={key}={value}");
    }

    if let Some(git_dir) = git(&["rev-parse", "--git-dir"]) {
        println!("cargo:rerun-if-changed={git_dir}/HEAD");
        println!("cargo:rerun-if-changed={git_dir}/index");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
