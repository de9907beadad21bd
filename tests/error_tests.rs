// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::io;

use nvflux::error::NvfluxError;

#[test]
fn test_io_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
    let err: NvfluxError = io_error.into();

    match err {
        NvfluxError::Io(_) => {}
        _ => panic!("Expected Io error, got different error type"),
    }
}

#[test]
fn test_disallowed_command_display() {
    let err = NvfluxError::DisallowedCommand("overclock".to_string());
    assert_eq!(err.to_string(), "disallowed command: overclock");
}

#[test]
fn test_exit_code_contract() {
    // These codes are observable: init scripts key off them.
    assert_eq!(NvfluxError::ToolNotFound.exit_code(), 3);
    assert_eq!(NvfluxError::InsufficientPrivilege.exit_code(), 4);
    assert_eq!(
        NvfluxError::DisallowedCommand("x".to_string()).exit_code(),
        5
    );
    assert_eq!(NvfluxError::ClockQueryFailed.exit_code(), 6);
}

#[test]
fn test_generic_failures_exit_nonzero() {
    let err: NvfluxError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
    assert_eq!(err.exit_code(), 1);
}
