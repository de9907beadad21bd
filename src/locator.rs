// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Trusted nvidia-smi discovery
//!
//! The privileged helper is located by search, never taken from the
//! caller: a short list of absolute install paths is probed first, then
//! each PATH entry. Letting an unprivileged user point a setuid process
//! at an arbitrary executable would hand them root.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use nix::unistd::{access, AccessFlags};

use crate::error::{NvfluxError, Result};

/// Absolute install locations probed before any PATH scan.
const CANDIDATES: &[&str] = &["/usr/bin/nvidia-smi", "/usr/local/bin/nvidia-smi"];

/// Executable name probed in each PATH entry.
const TOOL_NAME: &str = "nvidia-smi";

/// Resolved absolute path of the trusted tool.
///
/// Resolved once per invocation and threaded explicitly into every
/// privileged spawn; never re-derived from caller input afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedTool(PathBuf);

impl TrustedTool {
    /// Wrap a path whose install location is already known, verifying it
    /// is executable.
    pub fn at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if is_executable(&path) {
            Ok(TrustedTool(path))
        } else {
            Err(NvfluxError::ToolNotFound)
        }
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Locate the trusted tool, or fail with `ToolNotFound`.
pub fn locate() -> Result<TrustedTool> {
    let candidates: Vec<PathBuf> = CANDIDATES.iter().map(PathBuf::from).collect();
    search(&candidates, TOOL_NAME, env::var_os("PATH").as_deref())
        .map(TrustedTool)
        .ok_or(NvfluxError::ToolNotFound)
}

/// Probe the static candidates, then `<dir>/<tool_name>` for each PATH
/// entry in listed order. First executable match wins.
fn search(candidates: &[PathBuf], tool_name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    for candidate in candidates {
        if is_executable(candidate) {
            return Some(candidate.clone());
        }
    }

    for dir in env::split_paths(path_var?) {
        let candidate = dir.join(tool_name);
        if is_executable(&candidate) {
            tracing::debug!("resolved {} via PATH: {:?}", tool_name, candidate);
            return Some(candidate);
        }
    }

    None
}

fn is_executable(path: &Path) -> bool {
    access(path, AccessFlags::X_OK).is_ok()
}
