//! Embeds the release version in `fsdt --version`.
//!
//! Release tags look like `fsdt-v0.3.1`; builds from an untagged checkout
//! fall back to the package version with the short commit appended.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");

    let package = env!("CARGO_PKG_VERSION");
    let version = match (release_tag(), short_commit()) {
        (Some(tag), _) => tag,
        (None, Some(commit)) => format!("{}+{}", package, commit),
        (None, None) => package.to_string(),
    };

    println!("cargo:rustc-env=FSDT_VERSION={}", version);
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn release_tag() -> Option<String> {
    let tag = git(&["describe", "--tags", "--match", "fsdt-v*"])?;
    tag.strip_prefix("fsdt-v").map(str::to_string)
}

fn short_commit() -> Option<String> {
    git(&["rev-parse", "--short", "HEAD"])
}
