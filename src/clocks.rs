// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Memory clock parsing and policy selection
//!
//! The trusted tool reports clock values as free-form comma-separated
//! text with headers and units mixed in. `DigitRuns` scans that text for
//! runs of ASCII digits and yields them as integers, so the parsing rule
//! is testable without spawning anything. Selection over the sorted set
//! is a pure function of the requested mode.

use serde::{Deserialize, Serialize};
use std::fmt;

/// At most this many clock values are taken from one query.
const MAX_CLOCKS: usize = 128;

/// The named operating policy a user selects and that nvflux persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    Performance,
    Balanced,
    Powersaver,
    Auto,
}

impl PolicyMode {
    /// The lowercase token written to the state file.
    pub fn as_token(&self) -> &'static str {
        match self {
            PolicyMode::Performance => "performance",
            PolicyMode::Balanced => "balanced",
            PolicyMode::Powersaver => "powersaver",
            PolicyMode::Auto => "auto",
        }
    }

    /// Parse a state-file token. Anything outside the vocabulary is None.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "performance" => Some(PolicyMode::Performance),
            "balanced" => Some(PolicyMode::Balanced),
            "powersaver" => Some(PolicyMode::Powersaver),
            "auto" => Some(PolicyMode::Auto),
            _ => None,
        }
    }
}

impl fmt::Display for PolicyMode {
    /// Capitalized form used for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyMode::Performance => "Performance",
            PolicyMode::Balanced => "Balanced",
            PolicyMode::Powersaver => "Powersaver",
            PolicyMode::Auto => "Auto",
        };
        write!(f, "{name}")
    }
}

/// Lazy iterator over runs of ASCII digits in free-form text.
///
/// Non-digit bytes (labels, units, commas, localized noise) are skipped;
/// a run too large for `u32` is discarded rather than guessed at.
pub struct DigitRuns<'a> {
    rest: &'a [u8],
}

/// Scan `text` for digit runs.
pub fn digit_runs(text: &str) -> DigitRuns<'_> {
    DigitRuns {
        rest: text.as_bytes(),
    }
}

impl Iterator for DigitRuns<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            let start = self.rest.iter().position(|b| b.is_ascii_digit())?;
            let tail = &self.rest[start..];
            let len = tail
                .iter()
                .position(|b| !b.is_ascii_digit())
                .unwrap_or(tail.len());
            let run = &tail[..len];
            self.rest = &tail[len..];

            // Runs are pure ASCII digits, so utf8 and parse only fail on
            // u32 overflow.
            if let Ok(value) = std::str::from_utf8(run).unwrap_or("").parse() {
                return Some(value);
            }
        }
    }
}

/// Supported memory clock values in MHz, sorted descending.
///
/// Empty is a valid state and means the query failed or reported
/// nothing usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockSet(Vec<u32>);

impl ClockSet {
    /// Parse tool output into a descending clock set, capped at
    /// `MAX_CLOCKS` values.
    pub fn parse(text: &str) -> Self {
        let mut values: Vec<u32> = digit_runs(text).take(MAX_CLOCKS).collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        ClockSet(values)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn values(&self) -> &[u32] {
        &self.0
    }

    #[cfg(test)]
    fn from_values(mut values: Vec<u32>) -> Self {
        values.sort_unstable_by(|a, b| b.cmp(a));
        ClockSet(values)
    }
}

/// What a mode asks of the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTarget {
    /// Pin the memory clock to this value (MHz).
    Lock(u32),
    /// Release any lock and return control to the driver.
    Reset,
}

/// Select the target for `mode` over a descending clock set.
///
/// performance takes the maximum, powersaver the minimum, balanced the
/// element at `len / 2` (the lower-middle one for even counts). auto
/// never needs a value. Returns None when a lock is requested but the
/// set is empty; the dispatcher owns that fallback.
pub fn select_target(mode: PolicyMode, clocks: &ClockSet) -> Option<ClockTarget> {
    let values = clocks.values();
    let picked = match mode {
        PolicyMode::Auto => return Some(ClockTarget::Reset),
        PolicyMode::Performance => values.first(),
        PolicyMode::Balanced => values.get(values.len() / 2),
        PolicyMode::Powersaver => values.last(),
    };
    picked.map(|mhz| ClockTarget::Lock(*mhz))
}
