// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Persisted policy state
//!
//! One single-line file under the invoking user's home, so the chosen
//! mode can be replayed after reboot or driver reset. The process runs
//! with an elevated effective uid, but the record conceptually belongs
//! to the real user: after every write, ownership is handed back to them
//! best-effort.

use std::fs;
use std::path::PathBuf;

use nix::unistd::{chown, Uid, User};

use crate::clocks::PolicyMode;
use crate::error::Result;
use crate::privilege;

/// Relative state directory under the user's home.
const STATE_SUBDIR: &str = ".local/state/nvflux";

/// State file name inside the state directory.
const STATE_FILE: &str = "state";

/// Store for the persisted mode of one user.
pub struct StateStore {
    dir: PathBuf,
    owner: Option<Uid>,
}

impl StateStore {
    /// Store for the invoking (real, not effective) user. Home is
    /// resolved from the passwd database, then the environment, then the
    /// shared temp directory.
    pub fn for_real_user() -> Self {
        let uid = privilege::real_uid();
        StateStore {
            dir: home_for(uid).join(STATE_SUBDIR),
            owner: Some(uid),
        }
    }

    /// Store rooted at an explicit directory; ownership is left alone.
    /// Used by tests.
    pub fn with_root(dir: impl Into<PathBuf>) -> Self {
        StateStore {
            dir: dir.into(),
            owner: None,
        }
    }

    /// Persist `mode` as its lowercase token plus a trailing newline,
    /// replacing any previous record, then hand ownership to the real
    /// user. An ownership failure is tolerated; a write failure is not.
    pub fn write(&self, mode: PolicyMode) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.file_path();
        fs::write(&path, format!("{}\n", mode.as_token()))?;

        if let Some(uid) = self.owner {
            for target in [self.dir.as_path(), path.as_path()] {
                if let Err(e) = chown(target, Some(uid), None) {
                    tracing::debug!("chown {:?} to uid {}: {}", target, uid, e);
                }
            }
        }
        Ok(())
    }

    /// Read the persisted mode. A missing file, an unreadable first line
    /// or a token outside the vocabulary all read as absent.
    pub fn read(&self) -> Option<PolicyMode> {
        let content = fs::read_to_string(self.file_path()).ok()?;
        let line = content.lines().next()?;
        PolicyMode::from_token(line.trim_end())
    }

    fn file_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }
}

/// Home directory of `uid`: passwd entry, then `$HOME`, then the shared
/// temp directory.
fn home_for(uid: Uid) -> PathBuf {
    if let Ok(Some(user)) = User::from_uid(uid) {
        return user.dir;
    }
    dirs::home_dir().unwrap_or_else(std::env::temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_every_mode() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::with_root(dir.path());
        for mode in [
            PolicyMode::Performance,
            PolicyMode::Balanced,
            PolicyMode::Powersaver,
            PolicyMode::Auto,
        ] {
            store.write(mode).unwrap();
            assert_eq!(store.read(), Some(mode));
        }
    }

    #[test]
    fn test_file_is_token_plus_newline() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::with_root(dir.path());
        store.write(PolicyMode::Balanced).unwrap();
        let content = fs::read_to_string(dir.path().join(STATE_FILE)).unwrap();
        assert_eq!(content, "balanced\n");
    }

    #[test]
    fn test_write_replaces_previous_record() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::with_root(dir.path());
        store.write(PolicyMode::Performance).unwrap();
        store.write(PolicyMode::Powersaver).unwrap();
        let content = fs::read_to_string(dir.path().join(STATE_FILE)).unwrap();
        assert_eq!(content, "powersaver\n");
    }

    #[test]
    fn test_read_never_written_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::with_root(dir.path().join("nvflux"));
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_read_deleted_state_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::with_root(dir.path());
        store.write(PolicyMode::Auto).unwrap();
        fs::remove_file(dir.path().join(STATE_FILE)).unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_read_unknown_token_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::with_root(dir.path());
        fs::write(dir.path().join(STATE_FILE), "overclocked\n").unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_read_empty_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::with_root(dir.path());
        fs::write(dir.path().join(STATE_FILE), "").unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_write_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::with_root(dir.path().join("deep/nested/state"));
        store.write(PolicyMode::Auto).unwrap();
        assert_eq!(store.read(), Some(PolicyMode::Auto));
    }

    #[test]
    fn test_home_for_current_uid_resolves() {
        // Whatever the fallback chain picks, it must be non-empty.
        let home = home_for(Uid::current());
        assert!(!home.as_os_str().is_empty());
    }
}
