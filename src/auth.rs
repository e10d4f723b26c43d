//! Login, signup, and logout flows.
//!
//! Both auth screens behave the same way: send the draft to the server, and
//! on success persist the session and hand the server's notice back to the
//! caller. On failure the server's message is surfaced verbatim, falling
//! back to a screen-specific generic string; the draft stays intact for the
//! user to retry.

use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::api::ApiClient;
use crate::session::{SessionStore, User};

/// Pause between the success notice and navigating to the dashboard.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

const LOGIN_FALLBACK: &str = "Invalid email or password";
const SIGNUP_FALLBACK: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Server rejected the attempt; the string is what the user sees.
    #[error("{0}")]
    Rejected(String),

    #[error("could not persist session")]
    Store(#[source] anyhow::Error),
}

/// Sign in. On success the session is stored and the server's notice is
/// returned for display.
pub async fn login(
    session: &SessionStore,
    api: &ApiClient,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    let resp = api
        .login(email, password)
        .await
        .map_err(|e| AuthError::Rejected(e.message_or(LOGIN_FALLBACK).to_string()))?;
    session
        .set(&resp.token, &resp.user)
        .map_err(AuthError::Store)?;
    info!(email, "signed in");
    Ok(resp.message)
}

/// Create an account. Same shape as `login` with the register endpoint and
/// its own fallback message.
pub async fn signup(
    session: &SessionStore,
    api: &ApiClient,
    name: &str,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    let resp = api
        .register(name, email, password)
        .await
        .map_err(|e| AuthError::Rejected(e.message_or(SIGNUP_FALLBACK).to_string()))?;
    session
        .set(&resp.token, &resp.user)
        .map_err(AuthError::Store)?;
    info!(email, "account created");
    Ok(resp.message)
}

/// Navigate to the dashboard after a successful auth: wait out the fixed
/// delay the original client paused on the success notice, then fetch the
/// list for the board. The delay is a parameter so the sequencing is
/// testable without the full two seconds.
pub async fn navigate_to_dashboard(
    session: &SessionStore,
    api: &ApiClient,
    delay: Duration,
) -> Vec<crate::api::Task> {
    tokio::time::sleep(delay).await;
    crate::dashboard::DashboardScreen::new(session, api)
        .fetch_tasks()
        .await
}

/// Drop the stored session. The next protected screen redirects to login.
pub fn logout(session: &SessionStore) -> anyhow::Result<()> {
    session.clear()?;
    info!("signed out");
    Ok(())
}

/// The cached profile with the original client's placeholder fallbacks for
/// a missing or unreadable session.
pub fn profile(session: &SessionStore) -> User {
    session.user().unwrap_or_else(|| User {
        name: "User Name".to_string(),
        email: "user@example.com".to_string(),
    })
}
