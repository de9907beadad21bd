// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Privileged child-process execution
//!
//! One cohesive capability: spawn the trusted tool directly (never
//! through a shell) with a fully replaced, minimal environment, wait for
//! it, and map the outcome. Call sites cannot forget to sanitize the
//! environment or to reap the child. No caller-controlled string ever
//! becomes part of the executable path or the child environment.

use std::process::{Command, Stdio};

use crate::locator::TrustedTool;

/// Search path exported to the child; nothing caller-controlled.
const CHILD_PATH: &str = "/usr/sbin:/usr/bin:/sbin:/bin";

/// Fixed locale so tool output parses the same everywhere.
const CHILD_LOCALE: &str = "C";

/// Captured output is capped at this many bytes per stream; anything
/// beyond the cap is dropped silently.
pub const CAPTURE_LIMIT: usize = 4096;

/// Status reported when the child did not exit normally (killed by a
/// signal, or the spawn itself failed). Distinct from any exit code the
/// tool can produce.
pub const ABNORMAL_EXIT: i32 = -1;

/// Outcome of one privileged invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub status: i32,
    pub output: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Run the tool with output captured, stdout then stderr, each bounded
/// to `CAPTURE_LIMIT` bytes.
pub fn run_captured(tool: &TrustedTool, args: &[&str]) -> ExecutionResult {
    tracing::debug!("exec (captured): {:?} {:?}", tool.path(), args);
    let spawned = command(tool, args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    match spawned {
        Ok(out) => {
            let status = out.status.code().unwrap_or(ABNORMAL_EXIT);
            let mut output =
                String::from_utf8_lossy(truncated(&out.stdout)).into_owned();
            if !out.stderr.is_empty() {
                output.push_str(&String::from_utf8_lossy(truncated(&out.stderr)));
            }
            ExecutionResult { status, output }
        }
        Err(e) => {
            tracing::warn!("failed to run {:?}: {}", tool.path(), e);
            ExecutionResult {
                status: ABNORMAL_EXIT,
                output: String::new(),
            }
        }
    }
}

/// Run the tool with output discarded; returns the exit status only.
pub fn run_quiet(tool: &TrustedTool, args: &[&str]) -> i32 {
    tracing::debug!("exec (quiet): {:?} {:?}", tool.path(), args);
    let status = command(tool, args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(s) => s.code().unwrap_or(ABNORMAL_EXIT),
        Err(e) => {
            tracing::warn!("failed to run {:?}: {}", tool.path(), e);
            ABNORMAL_EXIT
        }
    }
}

/// Direct spawn from the resolved path with explicit argv and a
/// two-variable environment.
fn command(tool: &TrustedTool, args: &[&str]) -> Command {
    let mut cmd = Command::new(tool.path());
    cmd.args(args)
        .env_clear()
        .env("PATH", CHILD_PATH)
        .env("LC_ALL", CHILD_LOCALE)
        .stdin(Stdio::null());
    cmd
}

fn truncated(bytes: &[u8]) -> &[u8] {
    &bytes[..bytes.len().min(CAPTURE_LIMIT)]
}
