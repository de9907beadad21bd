// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Typed invocations of the trusted tool
//!
//! nvflux depends on exactly five nvidia-smi invocation shapes and on
//! its exit-code convention (0 = success). Every argument vector here is
//! fixed or derived from an already-validated integer; nothing
//! caller-controlled is ever spliced in.

use crate::clocks::{digit_runs, ClockSet};
use crate::exec;
use crate::locator::TrustedTool;

/// Turn on persistence mode so applied clocks survive driver idle
/// unload. Returns the tool's exit status.
pub fn enable_persistence(tool: &TrustedTool) -> i32 {
    exec::run_quiet(tool, &["-pm", "1"])
}

/// Pin the memory clock to a single value (min == max).
pub fn lock_memory_clocks(tool: &TrustedTool, mhz: u32) -> i32 {
    let range = format!("{mhz},{mhz}");
    exec::run_quiet(tool, &["-lmc", &range])
}

/// Release any locked memory clock range.
pub fn reset_memory_clocks(tool: &TrustedTool) -> i32 {
    exec::run_quiet(tool, &["-rmc"])
}

/// Query the supported memory clock values, descending. A failed query
/// or unparseable output reads as an empty set.
pub fn supported_memory_clocks(tool: &TrustedTool) -> ClockSet {
    let result = exec::run_captured(tool, &["--query-supported-clocks=mem", "--format=csv"]);
    if !result.success() {
        tracing::debug!("supported-clock query exited {}", result.status);
        return ClockSet::default();
    }
    ClockSet::parse(&result.output)
}

/// Query the live memory clock in MHz, if the tool reports one.
pub fn current_memory_clock(tool: &TrustedTool) -> Option<u32> {
    let result = exec::run_captured(tool, &["--query-gpu=clocks.mem", "--format=csv"]);
    if !result.success() {
        tracing::debug!("live-clock query exited {}", result.status);
        return None;
    }
    digit_runs(&result.output).next()
}
