// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command validation and sequencing
//!
//! The dispatcher is the privilege boundary: it checks the caller's
//! token against the closed vocabulary before anything else happens,
//! enforces the elevated-uid precondition, resolves the trusted tool
//! once, and sequences the other components. No privileged call is
//! reachable from an unvalidated token.

use serde::Serialize;

use crate::cli::{Cli, OutputFormat};
use crate::clocks::{select_target, ClockTarget, PolicyMode};
use crate::error::{NvfluxError, Result};
use crate::locator::{self, TrustedTool};
use crate::privilege;
use crate::smi;
use crate::state::StateStore;

/// Printed by every successful mutating command.
const SUCCESS_TOKEN: &str = "ok";

/// The closed command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Apply a policy mode and persist it.
    Apply(PolicyMode),
    /// Print the persisted mode.
    Status,
    /// Print the live memory clock.
    Clock,
    /// Re-apply the persisted mode without writing new state.
    Restore,
}

impl Command {
    /// Parse a caller-supplied token. Anything outside the closed set is
    /// None; there is no normalization and no prefix matching.
    pub fn from_token(token: &str) -> Option<Command> {
        match token {
            "performance" => Some(Command::Apply(PolicyMode::Performance)),
            "balanced" => Some(Command::Apply(PolicyMode::Balanced)),
            "powersaver" => Some(Command::Apply(PolicyMode::Powersaver)),
            "auto" | "reset" => Some(Command::Apply(PolicyMode::Auto)),
            "status" => Some(Command::Status),
            "clock" => Some(Command::Clock),
            // The restore hook is wired into unit files under its
            // historical flag spelling.
            "restore" | "--restore" => Some(Command::Restore),
            _ => None,
        }
    }
}

/// Validate the request and run it. Called once per invocation.
pub fn run(cli: &Cli) -> Result<()> {
    let command = Command::from_token(&cli.command)
        .ok_or_else(|| NvfluxError::DisallowedCommand(cli.command.clone()))?;

    if !privilege::is_elevated() {
        return Err(NvfluxError::InsufficientPrivilege);
    }

    let tool = locator::locate()?;
    let store = StateStore::for_real_user();
    dispatch(command, &tool, &store, &cli.format)
}

/// Sequence one validated command over resolved collaborators.
pub fn dispatch(
    command: Command,
    tool: &TrustedTool,
    store: &StateStore,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        Command::Status => run_status(store, format),
        Command::Clock => run_clock(tool, format),
        Command::Restore => run_restore(tool, store),
        Command::Apply(mode) => run_apply(mode, tool, store),
    }
}

#[derive(Serialize)]
struct StatusView {
    mode: PolicyMode,
    persisted: bool,
}

/// Read-only: report the persisted mode, defaulting to auto.
fn run_status(store: &StateStore, format: &OutputFormat) -> Result<()> {
    let persisted = store.read();
    let mode = persisted.unwrap_or(PolicyMode::Auto);
    match format {
        OutputFormat::Json => {
            let view = StatusView {
                mode,
                persisted: persisted.is_some(),
            };
            println!("{}", serde_json::to_string(&view)?);
        }
        OutputFormat::Text => println!("{mode}"),
    }
    Ok(())
}

#[derive(Serialize)]
struct ClockView {
    mhz: Option<u32>,
}

/// Read-only: report the live memory clock.
fn run_clock(tool: &TrustedTool, format: &OutputFormat) -> Result<()> {
    let mhz = smi::current_memory_clock(tool);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&ClockView { mhz })?),
        OutputFormat::Text => match mhz {
            Some(value) => println!("{value} MHz"),
            None => println!("Unavailable"),
        },
    }
    Ok(())
}

/// Re-apply the persisted mode. Absent state restores auto. Never
/// writes new state.
fn run_restore(tool: &TrustedTool, store: &StateStore) -> Result<()> {
    let mode = store.read().unwrap_or(PolicyMode::Auto);
    tracing::debug!("restoring persisted mode {}", mode.as_token());
    apply_mode(mode, tool)
}

/// Apply a mode, persist it, report success. The store write is
/// best-effort: the live hardware change is the primary concern and
/// restore-on-reboot degrades gracefully without it.
fn run_apply(mode: PolicyMode, tool: &TrustedTool, store: &StateStore) -> Result<()> {
    apply_mode(mode, tool)?;

    if let Err(e) = store.write(mode) {
        tracing::warn!("failed to persist mode {}: {}", mode.as_token(), e);
    }

    println!("{SUCCESS_TOKEN}");
    Ok(())
}

/// Drive the hardware to `mode` without touching the store.
///
/// auto skips the supported-clock query entirely and resets
/// unconditionally; the lock modes fail with `ClockQueryFailed` when the
/// query yields nothing. Helper exit codes are logged, not gated.
fn apply_mode(mode: PolicyMode, tool: &TrustedTool) -> Result<()> {
    let status = smi::enable_persistence(tool);
    if status != 0 {
        tracing::debug!("persistence-mode call exited {status}");
    }

    let target = if mode == PolicyMode::Auto {
        ClockTarget::Reset
    } else {
        let clocks = smi::supported_memory_clocks(tool);
        select_target(mode, &clocks).ok_or(NvfluxError::ClockQueryFailed)?
    };

    let status = match target {
        ClockTarget::Lock(mhz) => {
            tracing::debug!("locking memory clock to {mhz} MHz");
            smi::lock_memory_clocks(tool, mhz)
        }
        ClockTarget::Reset => {
            tracing::debug!("resetting memory clocks");
            smi::reset_memory_clocks(tool)
        }
    };
    if status != 0 {
        tracing::debug!("clock action exited {status}");
    }

    Ok(())
}
