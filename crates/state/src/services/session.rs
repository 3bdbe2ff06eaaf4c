//! Session manager.
//!
//! Single source of truth for "is someone logged in". The state machine is
//!
//! ```text
//! Initializing ──(stored user)──────────▶ LoggedIn
//! Initializing ──(no user / load error)─▶ LoggedOut
//! LoggedOut ────(login)─────────────────▶ LoggedIn
//! LoggedIn ─────(logout)────────────────▶ LoggedOut
//! ```
//!
//! In-memory state changes first and subscribers are notified right away;
//! persistence follows.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use crate::db::{Repository, RepositoryError, Session};
use crate::models::User;

/// Errors from session transitions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `login`/`logout` called before the stored session was loaded.
    #[error("session is still initializing")]
    Initializing,

    /// An operation needs a logged-in user and there is none.
    #[error("not logged in")]
    NotLoggedIn,

    /// Persisting the transition failed. The in-memory state has already
    /// changed.
    #[error("failed to persist session: {0}")]
    Repository(#[from] RepositoryError),
}

/// Authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Stored session not read yet.
    #[default]
    Initializing,
    /// No session stored, or it was cleared.
    LoggedOut,
    /// A user is signed in.
    LoggedIn(User),
}

impl SessionState {
    /// The logged-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        match self {
            Self::LoggedIn(user) => Some(user),
            Self::Initializing | Self::LoggedOut => None,
        }
    }

    /// Whether the startup load is still pending.
    #[must_use]
    pub const fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    /// Which screen set the navigator should show.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        match self {
            Self::Initializing => Screen::Loading,
            Self::LoggedOut => Screen::Unauthenticated,
            Self::LoggedIn(_) => Screen::Authenticated,
        }
    }
}

/// Navigation decision derived from [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Neither screen set; startup load pending.
    Loading,
    /// Login and registration.
    Unauthenticated,
    /// Catalog, cart, products and profile.
    Authenticated,
}

/// Holds the session state and persists it under `loggedInUser`.
///
/// Cheap to clone; clones share state and subscribers.
#[derive(Debug, Clone)]
pub struct SessionManager {
    repo: Repository<Session>,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionManager {
    /// Create a manager in the `Initializing` state.
    #[must_use]
    pub fn new(repo: Repository<Session>) -> Self {
        let (state, _) = watch::channel(SessionState::Initializing);
        Self {
            repo,
            state: Arc::new(state),
        }
    }

    /// Read the stored session and leave `Initializing`.
    ///
    /// Never fails: a missing, unreadable or corrupt record all resolve to
    /// `LoggedOut` so the UI is never stuck loading. Calling this again after
    /// it resolved does nothing.
    pub async fn initialize(&self) {
        if !self.is_initializing() {
            return;
        }

        let next = match self.repo.load().await {
            Ok(Some(user)) => {
                tracing::info!(email = %user.email, "Restored session");
                SessionState::LoggedIn(user)
            }
            Ok(None) => {
                tracing::debug!("No stored session");
                SessionState::LoggedOut
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not load stored session, starting logged out");
                SessionState::LoggedOut
            }
        };

        self.state.send_if_modified(|state| {
            if state.is_initializing() {
                *state = next;
                true
            } else {
                false
            }
        });
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().current_user().cloned()
    }

    /// The logged-in user, for operations behind the authenticated screens.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Initializing` before startup resolved and
    /// `SessionError::NotLoggedIn` when logged out.
    pub fn require_user(&self) -> Result<User, SessionError> {
        match &*self.state.borrow() {
            SessionState::Initializing => Err(SessionError::Initializing),
            SessionState::LoggedOut => Err(SessionError::NotLoggedIn),
            SessionState::LoggedIn(user) => Ok(user.clone()),
        }
    }

    /// Whether the startup load is still pending.
    #[must_use]
    pub fn is_initializing(&self) -> bool {
        self.state.borrow().is_initializing()
    }

    /// Which screen set the navigator should show.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.state.borrow().screen()
    }

    /// Receive every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Log `user` in and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Initializing` before [`initialize`](Self::initialize)
    /// has resolved. Returns `SessionError::Repository` if the write fails;
    /// the user stays logged in for this process either way.
    pub async fn login(&self, user: User) -> Result<(), SessionError> {
        if self.is_initializing() {
            return Err(SessionError::Initializing);
        }

        tracing::info!(email = %user.email, "Logged in");
        self.state.send_replace(SessionState::LoggedIn(user.clone()));
        self.repo.replace(&Some(user)).await?;
        Ok(())
    }

    /// Log out and remove the stored session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Initializing` before startup resolved, or
    /// `SessionError::Repository` if the stored record cannot be removed.
    pub async fn logout(&self) -> Result<(), SessionError> {
        if self.is_initializing() {
            return Err(SessionError::Initializing);
        }

        tracing::info!("Logged out");
        self.state.send_replace(SessionState::LoggedOut);
        self.repo.clear().await?;
        Ok(())
    }
}
