//! Client-side session persistence.
//!
//! The session is two values surviving across runs: an opaque auth token and
//! the cached user profile. They live as two files under the data dir,
//! `token` and `user.json` — the same two keys the server's web client keeps
//! in browser local storage. Written on successful login/signup, cleared on
//! logout, read by the route guard and by every authenticated API call.
//!
//! There is no expiry and no refresh: the session is read-only between
//! `set` and `clear`.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// Cached profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    /// Up to two uppercased initials from the name, `"UN"` when empty.
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase();
        if initials.is_empty() {
            "UN".to_string()
        } else {
            initials
        }
    }
}

/// On-disk session store.
///
/// Storage is accessed synchronously and operations are not composed, so
/// there is no locking; concurrent processes are not coordinated.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.to_path_buf(),
        }
    }

    /// Persist a new session, overwriting any prior one.
    pub fn set(&self, token: &str, user: &User) -> Result<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("could not create data directory {}", self.dir.display())
        })?;
        std::fs::write(self.dir.join(TOKEN_FILE), token)
            .context("could not write session token")?;
        let json = serde_json::to_string(user).context("could not serialize user profile")?;
        std::fs::write(self.dir.join(USER_FILE), json)
            .context("could not write user profile")?;
        Ok(())
    }

    /// Stored token, or `None` when no session exists.
    ///
    /// An empty or whitespace-only token file counts as absent.
    pub fn token(&self) -> Option<String> {
        let raw = std::fs::read_to_string(self.dir.join(TOKEN_FILE)).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_owned())
        }
    }

    /// Stored user profile, or `None` when absent or unreadable.
    pub fn user(&self) -> Option<User> {
        let path = self.dir.join(USER_FILE);
        let raw = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(path = %path.display(), err = %e, "stored user profile is unreadable");
                None
            }
        }
    }

    /// Delete the session. Missing files are not an error; subsequent
    /// `token()` returns `None`.
    pub fn clear(&self) -> Result<()> {
        for file in [TOKEN_FILE, USER_FILE] {
            match std::fs::remove_file(self.dir.join(file)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("could not remove {file}"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user() -> User {
        User {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn set_then_token_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.set("T1", &user()).unwrap();
        assert_eq!(store.token().as_deref(), Some("T1"));
        assert_eq!(store.user(), Some(user()));
    }

    #[test]
    fn set_overwrites_prior_session() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.set("T1", &user()).unwrap();
        let other = User {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
        };
        store.set("T2", &other).unwrap();
        assert_eq!(store.token().as_deref(), Some("T2"));
        assert_eq!(store.user(), Some(other));
    }

    #[test]
    fn clear_makes_token_absent() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.set("T1", &user()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn clear_without_session_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.clear().unwrap();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn whitespace_token_counts_as_absent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("token"), "  \n").unwrap();
        let store = SessionStore::new(dir.path());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn corrupt_user_file_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.set("T1", &user()).unwrap();
        std::fs::write(dir.path().join("user.json"), "{not json").unwrap();
        assert_eq!(store.user(), None);
        // Token is unaffected.
        assert_eq!(store.token().as_deref(), Some("T1"));
    }

    #[test]
    fn initials_take_first_two_name_parts() {
        let u = user();
        assert_eq!(u.initials(), "AL");

        let single = User {
            name: "plato".to_string(),
            email: "p@example.com".to_string(),
        };
        assert_eq!(single.initials(), "P");

        let empty = User {
            name: String::new(),
            email: String::new(),
        };
        assert_eq!(empty.initials(), "UN");
    }
}
