// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for nvflux
//!
//! This module defines all error types used throughout the application,
//! together with the process exit code each one maps to. The exit codes
//! are part of the observable contract: init scripts and callers key off
//! them to tell configuration, input and query failures apart.

use thiserror::Error;

/// Main error type for nvflux operations
#[derive(Error, Debug)]
pub enum NvfluxError {
    /// No executable nvidia-smi on the trusted install paths or PATH
    #[error("nvidia-smi not found (checked trusted install paths and PATH)")]
    ToolNotFound,

    /// The effective uid is not root
    #[error("insufficient privilege: nvflux must run with an elevated effective uid (is the setuid bit set?)")]
    InsufficientPrivilege,

    /// Command token outside the closed vocabulary
    #[error("disallowed command: {0}")]
    DisallowedCommand(String),

    /// Supported-clock query failed or returned no values while a clock
    /// lock was requested
    #[error("supported memory clocks unavailable; only 'auto' or 'reset' can be applied")]
    ClockQueryFailed,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NvfluxError {
    /// Process exit code for this error. 0 is success; 2 is reserved
    /// for clap usage errors (missing or malformed arguments).
    pub fn exit_code(&self) -> i32 {
        match self {
            NvfluxError::ToolNotFound => 3,
            NvfluxError::InsufficientPrivilege => 4,
            NvfluxError::DisallowedCommand(_) => 5,
            NvfluxError::ClockQueryFailed => 6,
            NvfluxError::Io(_) | NvfluxError::Json(_) => 1,
        }
    }
}

/// Result type alias for nvflux operations
pub type Result<T> = std::result::Result<T, NvfluxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_not_found_display() {
        let err = NvfluxError::ToolNotFound;
        assert!(err.to_string().contains("nvidia-smi not found"));
    }

    #[test]
    fn test_insufficient_privilege_display() {
        let err = NvfluxError::InsufficientPrivilege;
        assert!(err.to_string().contains("insufficient privilege"));
        assert!(err.to_string().contains("setuid"));
    }

    #[test]
    fn test_disallowed_command_display() {
        let err = NvfluxError::DisallowedCommand("frobnicate".to_string());
        assert_eq!(err.to_string(), "disallowed command: frobnicate");
    }

    #[test]
    fn test_clock_query_failed_display() {
        let err = NvfluxError::ClockQueryFailed;
        assert!(err.to_string().contains("memory clocks unavailable"));
    }

    #[test]
    fn test_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NvfluxError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            NvfluxError::ToolNotFound.exit_code(),
            NvfluxError::InsufficientPrivilege.exit_code(),
            NvfluxError::DisallowedCommand("x".to_string()).exit_code(),
            NvfluxError::ClockQueryFailed.exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, 0);
            assert_ne!(*a, 2, "2 is reserved for usage errors");
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn test_fn() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(test_fn().unwrap(), 42);
    }
}
