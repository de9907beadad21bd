// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! The command itself is a plain string token: membership in the closed
//! command vocabulary is checked by the dispatcher, not by clap, so that
//! a disallowed token gets its own documented exit code instead of a
//! generic usage error.

use clap::{Parser, ValueEnum};

/// nvflux - apply and persist an NVIDIA memory clock policy
#[derive(Parser, Debug)]
#[command(name = "nvflux")]
#[command(version, about = "Apply and persist an NVIDIA memory clock policy")]
pub struct Cli {
    /// Command: performance, balanced, powersaver, auto, reset, status, clock or restore
    ///
    /// Hyphen values are allowed through so the historical `--restore`
    /// spelling used by unit files reaches the dispatcher.
    #[arg(allow_hyphen_values = true)]
    pub command: String,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format for status and clock
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for the informational commands
#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}
