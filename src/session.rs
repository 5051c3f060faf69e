//! Session gate.
//!
//! The session lives inside a single [`SessionController`]. Clones of the
//! controller share that state, so the API client and the UI observe the
//! same session. State only changes through the named transitions below;
//! every effective change is broadcast to subscribers.

use dinawin_shared::{AccessScope, UserProfile};
use std::sync::{Arc, PoisonError, RwLock};

/// Client-held authentication record.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated { token: String, user: UserProfile },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            Session::Unauthenticated => None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            Session::Unauthenticated => None,
        }
    }

    /// Path family for the current user. Anonymous callers default to staff
    /// paths; the server rejects them anyway.
    pub fn scope(&self) -> AccessScope {
        self.user().map(UserProfile::scope).unwrap_or_default()
    }
}

/// What happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    LoggedIn,
    LoggedOut,
    /// The server rejected the token.
    Expired,
    TokenRefreshed,
    ProfileUpdated,
}

type Listener = Arc<dyn Fn(SessionChange, &Session) + Send + Sync>;

#[derive(Default)]
struct Inner {
    session: Session,
    listeners: Vec<Listener>,
}

#[derive(Clone, Default)]
pub struct SessionController {
    inner: Arc<RwLock<Inner>>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("is_authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current session.
    pub fn snapshot(&self) -> Session {
        self.read(|session| session.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(Session::is_authenticated)
    }

    pub fn token(&self) -> Option<String> {
        self.read(|session| session.token().map(str::to_string))
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read(|session| session.user().cloned())
    }

    pub fn scope(&self) -> AccessScope {
        self.read(Session::scope)
    }

    /// Registers a listener for every effective transition.
    ///
    /// Listeners run after the state lock is released, so they may read the
    /// controller again.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(SessionChange, &Session) + Send + Sync + 'static,
    {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .push(Arc::new(listener));
    }

    // --- Transitions ---

    /// `Unauthenticated → Authenticated`, or replaces an existing login.
    pub fn login(&self, token: String, user: UserProfile) {
        log::info!("session: signed in as {}", user.username);
        self.transition(SessionChange::LoggedIn, |session| {
            *session = Session::Authenticated { token, user };
            true
        });
    }

    /// Explicit logout. Returns `false` when there was no session.
    pub fn logout(&self) -> bool {
        let changed = self.transition(SessionChange::LoggedOut, Self::clear);
        if changed {
            log::info!("session: signed out");
        }
        changed
    }

    /// Forced logout after the server rejected the token.
    pub fn expire(&self) -> bool {
        let changed = self.transition(SessionChange::Expired, Self::clear);
        if changed {
            log::warn!("session: token rejected by server, signing out");
        }
        changed
    }

    /// Like [`expire`](Self::expire), but only while the session still holds
    /// `token`. A late 401 for a replaced token leaves the newer login alone.
    pub fn expire_if_token(&self, token: &str) -> bool {
        let changed = self.transition(SessionChange::Expired, |session| {
            session.token() == Some(token) && Self::clear(session)
        });
        if changed {
            log::warn!("session: token rejected by server, signing out");
        } else {
            log::debug!("session: ignoring 401 for a token no longer in use");
        }
        changed
    }

    /// Swaps the token of an active session. No-op when signed out.
    pub fn refresh_token(&self, new_token: String) -> bool {
        self.transition(SessionChange::TokenRefreshed, |session| match session {
            Session::Authenticated { token, .. } => {
                *token = new_token;
                true
            }
            Session::Unauthenticated => false,
        })
    }

    /// Replaces the profile of an active session. No-op when signed out.
    pub fn update_user(&self, profile: UserProfile) -> bool {
        self.transition(SessionChange::ProfileUpdated, |session| match session {
            Session::Authenticated { user, .. } => {
                *user = profile;
                true
            }
            Session::Unauthenticated => false,
        })
    }

    // --- Internals ---

    fn clear(session: &mut Session) -> bool {
        if session.is_authenticated() {
            *session = Session::Unauthenticated;
            true
        } else {
            false
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard.session)
    }

    fn transition(&self, change: SessionChange, apply: impl FnOnce(&mut Session) -> bool) -> bool {
        let (snapshot, listeners) = {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            if !apply(&mut guard.session) {
                return false;
            }
            (guard.session.clone(), guard.listeners.clone())
        };
        for listener in listeners {
            listener(change, &snapshot);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn user(is_employee: bool) -> UserProfile {
        UserProfile {
            id: 1,
            username: "admin".to_string(),
            full_name: "Shop Admin".to_string(),
            is_dinawin_employee: is_employee,
            roles: vec!["admin".to_string()],
        }
    }

    fn recorder(controller: &SessionController) -> Arc<Mutex<Vec<SessionChange>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        controller.subscribe(move |change, _| sink.lock().unwrap().push(change));
        seen
    }

    #[test]
    fn starts_unauthenticated() {
        let controller = SessionController::new();
        assert!(!controller.is_authenticated());
        assert_eq!(controller.token(), None);
        assert_eq!(controller.user(), None);
        assert_eq!(controller.snapshot(), Session::Unauthenticated);
    }

    #[test]
    fn login_then_logout() {
        let controller = SessionController::new();
        let seen = recorder(&controller);

        controller.login("tok-1".to_string(), user(true));
        assert!(controller.is_authenticated());
        assert_eq!(controller.token().as_deref(), Some("tok-1"));
        assert_eq!(controller.scope(), AccessScope::Staff);

        assert!(controller.logout());
        assert!(!controller.is_authenticated());
        assert!(!controller.logout());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![SessionChange::LoggedIn, SessionChange::LoggedOut]
        );
    }

    #[test]
    fn clones_share_state() {
        let controller = SessionController::new();
        let other = controller.clone();
        controller.login("tok".to_string(), user(false));
        assert!(other.is_authenticated());
        assert_eq!(other.scope(), AccessScope::Customer);
    }

    #[test]
    fn refresh_and_profile_update_need_a_session() {
        let controller = SessionController::new();
        let seen = recorder(&controller);
        assert!(!controller.refresh_token("x".to_string()));
        assert!(!controller.update_user(user(true)));
        assert!(!controller.expire());
        assert!(seen.lock().unwrap().is_empty());

        controller.login("old".to_string(), user(true));
        assert!(controller.refresh_token("new".to_string()));
        assert_eq!(controller.token().as_deref(), Some("new"));

        let mut promoted = user(false);
        promoted.full_name = "Renamed".to_string();
        assert!(controller.update_user(promoted.clone()));
        assert_eq!(controller.user(), Some(promoted));
        assert_eq!(controller.token().as_deref(), Some("new"));
    }

    #[test]
    fn conditional_expiry_only_clears_matching_token() {
        let controller = SessionController::new();
        let seen = recorder(&controller);
        assert!(!controller.expire_if_token("old"));

        controller.login("new".to_string(), user(true));
        assert!(!controller.expire_if_token("old"));
        assert_eq!(controller.token().as_deref(), Some("new"));

        assert!(controller.expire_if_token("new"));
        assert!(!controller.is_authenticated());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![SessionChange::LoggedIn, SessionChange::Expired]
        );
    }

    #[test]
    fn listener_receives_new_state_and_can_read_controller() {
        let controller = SessionController::new();
        let observed = Arc::new(Mutex::new(None));
        let sink = observed.clone();
        let reader = controller.clone();
        controller.subscribe(move |change, session| {
            assert_eq!(reader.is_authenticated(), session.is_authenticated());
            *sink.lock().unwrap() = Some((change, session.token().map(str::to_string)));
        });

        controller.login("abc".to_string(), user(true));
        assert_eq!(
            *observed.lock().unwrap(),
            Some((SessionChange::LoggedIn, Some("abc".to_string())))
        );

        controller.expire();
        assert_eq!(
            *observed.lock().unwrap(),
            Some((SessionChange::Expired, None))
        );
    }
}
