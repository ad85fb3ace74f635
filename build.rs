use std::env;
use std::process::Command;

const VERSION_ENV: &str = "TASKDESK_VERSION";

/// `git describe` of the checkout being built, if there is one.
fn describe() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    let raw = String::from_utf8_lossy(&out.stdout);
    let tag = raw.trim();
    let tag = tag.strip_prefix('v').unwrap_or(tag);
    (!tag.is_empty()).then(|| tag.to_string())
}

fn main() {
    println!("cargo:rerun-if-env-changed={VERSION_ENV}");

    let version = env::var(VERSION_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(describe)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=TASKDESK_BUILD_VERSION={version}");
}
