//! Authentication context.
//!
//! The `SessionController` from the core crate owns the session. This module
//! mirrors it into a Leptos signal so views re-render on login, logout and
//! forced expiry, and hands the API client to pages through context.

use crate::web::{BrowserHttpClient, LocalStorage};
use dinawin::shared::UserProfile;
use dinawin::shared::protocol::Credentials;
use dinawin::{ApiClient, ClientConfig, KeyValueStore, Session, SessionChange, SessionController};
use leptos::prelude::*;

const STORAGE_USERNAME_KEY: &str = "dinawin_username";

pub type Api = ApiClient<BrowserHttpClient>;

#[derive(Clone)]
pub struct AuthContext {
    /// Read-only mirror of the controller's session.
    pub session: ReadSignal<Session>,
    pub api: Api,
    /// Last username that signed in successfully, for the login form.
    pub last_username: RwSignal<String>,
}

impl AuthContext {
    pub fn new(config: ClientConfig) -> Self {
        let controller = SessionController::new();
        let (session, set_session) = signal(controller.snapshot());

        controller.subscribe(move |change, current| {
            if change == SessionChange::Expired {
                log::warn!("auth: session expired");
            }
            set_session.set(current.clone());
        });

        Self {
            session,
            api: ApiClient::new(config, BrowserHttpClient, controller),
            last_username: RwSignal::new(String::new()),
        }
    }

    /// Injected into the router.
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(Session::is_authenticated))
    }

    pub fn user_signal(&self) -> Signal<Option<UserProfile>> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.user().cloned()))
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// Shortcut for pages that only need to issue requests.
pub fn use_api() -> Api {
    use_auth().api
}

/// Restores the remembered username. The token is never persisted.
pub fn init_auth(ctx: &AuthContext) {
    if let Some(username) = LocalStorage.get(STORAGE_USERNAME_KEY) {
        ctx.last_username.set(username);
    }
}

/// Signs in. Navigation happens through the router's auth effect.
pub async fn login(ctx: &AuthContext, username: String, password: String) -> Result<(), String> {
    let credentials = Credentials { username, password };
    match ctx.api.login(&credentials).await {
        Ok(user) => {
            LocalStorage.set(STORAGE_USERNAME_KEY, &user.username);
            ctx.last_username.set(user.username);
            Ok(())
        }
        Err(e) if e.is_unauthorized() => Err("Wrong username or password.".to_string()),
        Err(e) => Err(e.user_message()),
    }
}

/// Drops the session. The router redirects to the login page.
pub fn logout(ctx: &AuthContext) {
    ctx.api.logout();
}

/// Removes the remembered username from this browser.
pub fn forget_username(ctx: &AuthContext) {
    LocalStorage.delete(STORAGE_USERNAME_KEY);
    ctx.last_username.set(String::new());
}
