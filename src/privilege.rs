// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Real vs effective identity at the setuid boundary.
//!
//! nvflux is installed setuid root: the effective uid performs the
//! privileged hardware calls, while the real uid identifies the invoking
//! user for state-file placement and ownership.

use nix::unistd::Uid;

/// Returns true if the effective uid is root.
pub fn is_elevated() -> bool {
    Uid::effective().is_root()
}

/// The invoking user's real uid.
pub fn real_uid() -> Uid {
    Uid::current()
}
