//! Compose process invocation
//!
//! The compose binary inherits stdout and stderr; its lifetime bounds ours
//! and its exit code becomes our exit code. Filtered runs hand the document
//! over on stdin (`-f -`), pass-through runs point at the file on disk.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, SkiffError};

/// Argument list for a pass-through run: the original tokens, unchanged,
/// behind `-f <file>`
pub fn passthrough_args(compose_file: &Path, tokens: &[String]) -> Vec<String> {
    let mut args = vec!["-f".to_string(), compose_file.display().to_string()];
    args.extend(tokens.iter().cloned());
    args
}

/// Argument list for a filtered run: the document arrives on stdin
///
/// A filtered `up` gets `--remove-orphans` appended unless already present,
/// so containers of deselected services do not linger.
pub fn filtered_args(subcommand: &str, cmd_options: &[String]) -> Vec<String> {
    let mut args = vec!["-f".to_string(), "-".to_string(), subcommand.to_string()];
    args.extend(cmd_options.iter().cloned());

    if subcommand == "up" && !cmd_options.iter().any(|opt| opt == "--remove-orphans") {
        args.push("--remove-orphans".to_string());
    }

    args
}

/// Spawn the compose binary and wait for it, returning its exit code
pub fn run(binary: &str, args: &[String]) -> Result<i32> {
    let status = Command::new(binary)
        .args(args)
        .status()
        .map_err(|err| spawn_failed(binary, &err))?;

    Ok(exit_code(status))
}

/// Spawn the compose binary with the document piped to its stdin, wait for
/// it, and return its exit code
pub fn run_with_stdin(binary: &str, args: &[String], document: &str) -> Result<i32> {
    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|err| spawn_failed(binary, &err))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(document.as_bytes())?;
        // stdin drops here, closing the pipe before the wait
    }

    let status = child.wait().map_err(|err| spawn_failed(binary, &err))?;
    Ok(exit_code(status))
}

fn spawn_failed(binary: &str, err: &std::io::Error) -> SkiffError {
    SkiffError::SpawnFailed {
        binary: binary.to_string(),
        reason: err.to_string(),
    }
}

/// A child killed by a signal has no exit code; fall back to 1
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_passthrough_args_keep_token_order() {
        let args = passthrough_args(Path::new("custom.yml"), &options(&["up", "-d", "--build"]));
        assert_eq!(args, ["-f", "custom.yml", "up", "-d", "--build"]);
    }

    #[test]
    fn test_filtered_args_read_from_stdin() {
        let args = filtered_args("logs", &options(&["-f", "web"]));
        assert_eq!(args, ["-f", "-", "logs", "-f", "web"]);
    }

    #[test]
    fn test_filtered_up_appends_remove_orphans() {
        let args = filtered_args("up", &options(&["-d"]));
        assert_eq!(args, ["-f", "-", "up", "-d", "--remove-orphans"]);
    }

    #[test]
    fn test_filtered_up_does_not_duplicate_remove_orphans() {
        let args = filtered_args("up", &options(&["-d", "--remove-orphans"]));
        assert_eq!(
            args.iter().filter(|a| *a == "--remove-orphans").count(),
            1
        );
    }

    #[test]
    fn test_filtered_non_up_leaves_options_alone() {
        let args = filtered_args("down", &options(&[]));
        assert_eq!(args, ["-f", "-", "down"]);
    }

    #[test]
    fn test_run_unknown_binary_is_spawn_error() {
        let err = run("skiff-test-no-such-binary", &[]).unwrap_err();
        assert!(matches!(err, SkiffError::SpawnFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_propagates_exit_code() {
        assert_eq!(run("true", &[]).unwrap(), 0);
        assert_eq!(run("false", &[]).unwrap(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_stdin_delivers_document() {
        let args = options(&["-c", "grep -q nginx"]);
        assert_eq!(run_with_stdin("sh", &args, "image: nginx\n").unwrap(), 0);
        assert_eq!(run_with_stdin("sh", &args, "image: redis\n").unwrap(), 1);
    }
}
