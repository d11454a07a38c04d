use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI binary against an isolated credential store.
pub fn run_cli(store: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fsdt"));
    cmd.arg("--store").arg(store);
    cmd.args(args);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_success(store: &Path, args: &[&str]) -> String {
    let output = run_cli(store, args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_failure(store: &Path, args: &[&str]) -> String {
    let output = run_cli(store, args);
    assert!(
        !output.status.success(),
        "CLI command unexpectedly succeeded: {:?}\nstdout: {}",
        args,
        String::from_utf8_lossy(&output.stdout)
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Initialise a kerberos store for `principal`.
pub fn init_secure_store(store: &Path, principal: &str) {
    run_cli_success(
        store,
        &["init", "--principal", principal, "--authentication", "kerberos"],
    );
}
