//! Route guard: decides whether a requested screen may render.
//!
//! The whole check is token presence in the session store. There is no
//! expiry check and no server round-trip to validate the token — a stale
//! token renders the screen and fails later at the API instead.

use crate::session::SessionStore;

/// A navigable screen of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Signup,
    Dashboard,
    /// The cached profile view. Public: without a session it shows
    /// placeholder values rather than redirecting.
    Profile,
}

impl Screen {
    pub fn requires_auth(self) -> bool {
        matches!(self, Screen::Dashboard)
    }
}

/// Outcome of resolving a navigation request against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(Screen),
    RedirectToLogin,
}

/// Resolve a requested screen: protected screens render only when a token
/// is present; an absent token redirects to login instead.
pub fn resolve(screen: Screen, session: &SessionStore) -> Resolution {
    if screen.requires_auth() && session.token().is_none() {
        return Resolution::RedirectToLogin;
    }
    Resolution::Render(screen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::User;
    use tempfile::TempDir;

    #[test]
    fn absent_token_redirects_protected_screens() {
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(dir.path());
        assert_eq!(
            resolve(Screen::Dashboard, &session),
            Resolution::RedirectToLogin
        );
    }

    #[test]
    fn present_token_renders_requested_screen() {
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(dir.path());
        let user = User {
            name: "A".to_string(),
            email: "a@b.com".to_string(),
        };
        session.set("T1", &user).unwrap();
        assert_eq!(
            resolve(Screen::Dashboard, &session),
            Resolution::Render(Screen::Dashboard)
        );
    }

    #[test]
    fn public_screens_render_without_a_session() {
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(dir.path());
        for screen in [Screen::Login, Screen::Signup, Screen::Profile] {
            assert_eq!(resolve(screen, &session), Resolution::Render(screen));
        }
    }

    #[test]
    fn token_presence_is_the_whole_check() {
        // Any non-empty token passes — no expiry, no validation.
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(dir.path());
        std::fs::write(dir.path().join("token"), "obviously-not-a-real-jwt").unwrap();
        assert_eq!(
            resolve(Screen::Dashboard, &session),
            Resolution::Render(Screen::Dashboard)
        );
    }
}
