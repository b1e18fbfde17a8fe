//! Login, logout and session restore.
//!
//! Every flow that changes the account also clears the cache, so one
//! account's notes are never served to another.

use notedesk_client::{ActiveSession, SessionRecord};
use tracing::{info, warn};

use crate::cache::refresher::with_timeout;
use crate::error::AppError;
use crate::state::AppState;

/// Identity of the account after a login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user_id: Option<String>,
    pub nickname: Option<String>,
}

/// Logs in with `cookie`.
///
/// The account profile is looked up once; if that fails the login still
/// succeeds and the user id is resolved on the first content refresh.
pub async fn login(state: &AppState, cookie: &str) -> Result<LoginOutcome, AppError> {
    let cookie = cookie.trim();
    if cookie.is_empty() {
        return Err(AppError::BadRequest("Cookie is required".to_string()));
    }

    let source = state.factory().connect(cookie)?;
    let timeout = state.cache().store().config().upstream_timeout;

    let outcome = match with_timeout(timeout, source.self_info()).await {
        Ok(me) => LoginOutcome {
            user_id: me.user_id().map(str::to_string),
            nickname: Some(me.nickname).filter(|n| !n.is_empty()),
        },
        Err(e) => {
            warn!(error = %e, "Could not load account profile at login");
            LoginOutcome::default()
        }
    };

    let record = SessionRecord::new(cookie, outcome.user_id.clone());
    if let Err(e) = state.session_store().save(&record).await {
        warn!(
            path = %state.session_store().path().display(),
            error = %e,
            "Failed to persist session"
        );
    }

    state.session().replace(
        ActiveSession::new(source).with_identity(outcome.user_id.clone(), outcome.nickname.clone()),
    );
    let cleared = state.cache().clear_all();

    info!(
        user_id = outcome.user_id.as_deref().unwrap_or("unknown"),
        cleared_details = cleared.details,
        "Logged in"
    );
    Ok(outcome)
}

/// Logs out and forgets the persisted cookie. Returns false if no session
/// was active.
pub async fn logout(state: &AppState) -> bool {
    let was_active = state.session().clear();

    if let Err(e) = state.session_store().clear().await {
        warn!(error = %e, "Failed to remove persisted session");
    }
    state.cache().clear_all();

    info!(was_active, "Logged out");
    was_active
}

/// Restores the persisted session, if any. No network I/O.
pub async fn restore(state: &AppState) -> bool {
    let record = match state.session_store().load().await {
        Ok(Some(record)) => record,
        Ok(None) => return false,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable session file");
            return false;
        }
    };

    match state.factory().connect(&record.cookie) {
        Ok(source) => {
            state
                .session()
                .replace(ActiveSession::new(source).with_identity(record.user_id.clone(), None));
            info!(
                user_id = record.user_id.as_deref().unwrap_or("unknown"),
                "Restored saved session"
            );
            true
        }
        Err(e) => {
            warn!(error = %e, "Saved session could not be restored");
            false
        }
    }
}
