//! History-API router.
//!
//! All access to `window.history` lives here. Every navigation runs through
//! the session guard before the route signal changes, so the outlet never
//! mounts a protected page for an anonymous visitor.

use dinawin::route::{AppRoute, RouteDecision, guard};
use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::JsValue;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// Used for redirects so the rejected URL does not stay in history.
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// Injected by the app so the router does not depend on the auth module.
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let decision = guard(requested, is_authenticated.get_untracked());
        if decision.is_redirect() {
            replace_history_state(decision.route().to_path());
        }
        let (current_route, set_route) = signal(decision.route());

        Self {
            current_route,
            set_route,
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn go(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// `use_push` picks pushState over replaceState for allowed targets.
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        match guard(target_route, self.is_authenticated.get_untracked()) {
            RouteDecision::Redirect(redirect) => {
                log::debug!("router: {} rejected, redirecting to {}", target_route, redirect);
                replace_history_state(redirect.to_path());
                self.set_route.set(redirect);
            }
            RouteDecision::Allow(route) => {
                if use_push {
                    push_history_state(route.to_path());
                } else {
                    replace_history_state(route.to_path());
                }
                self.set_route.set(route);
            }
        }
    }

    /// Back/forward buttons go through the same guard.
    fn init_popstate_listener(&self) {
        let router = *self;
        // The listener lives as long as the page.
        let _handle = window_event_listener(ev::popstate, move |_| {
            let target = AppRoute::from_path(&current_path());
            router.navigate_to_route(target, false);
        });
    }

    /// Login and logout (including forced expiry) move the user immediately.
    fn setup_auth_redirect(&self) {
        let router = *self;
        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let route = router.current_route.get_untracked();
            let decision = guard(route, is_auth);
            if decision.is_redirect() {
                log::info!(
                    "router: session changed (authenticated: {}), redirecting to {}",
                    is_auth,
                    decision.route()
                );
                push_history_state(decision.route().to_path());
                router.set_route.set(decision.route());
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// Components
// ============================================================================

#[component]
pub fn Router(is_authenticated: Signal<bool>, children: Children) -> impl IntoView {
    provide_router(is_authenticated);
    children()
}

#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();
    move || matcher(router.current_route().get())
}

/// In-app link that goes through the router instead of reloading the page.
#[component]
pub fn Link(route: AppRoute, children: Children) -> impl IntoView {
    let router = use_router();
    let on_click = move |ev: ev::MouseEvent| {
        ev.prevent_default();
        router.go(route);
    };
    let class = move || {
        if router.current_route().get() == route {
            "nav-link active"
        } else {
            "nav-link"
        }
    };

    view! {
        <a href=route.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
