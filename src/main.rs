// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! nvflux - apply and persist an NVIDIA memory clock policy
//!
//! Entry point for the nvflux CLI.

use clap::Parser;

use nvflux::cli::Cli;
use nvflux::dispatch;

fn main() {
    // Parse CLI arguments; clap owns usage errors (exit code 2).
    let cli = Cli::parse();

    // Initialize tracing. Logs go to stderr: stdout carries the
    // command's answer and nothing else.
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // Practical debug toggle: `-v` enables nvflux diagnostics without
    // requiring users to know target names. `RUST_LOG` still takes
    // precedence.
    if cli.verbose > 0 {
        if let Ok(directive) = "nvflux=debug".parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dispatch::run(&cli) {
        eprintln!("nvflux: {e}");
        std::process::exit(e.exit_code());
    }
}
