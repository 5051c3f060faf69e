//! Dinawin admin front-end.
//!
//! Context-driven layout:
//! - `auth`: session signal and API client, shared through context
//! - `theme`: persisted light/dark preference
//! - `web`: browser adapters (fetch, localStorage, History router)
//! - `components`: pages and the shell around them

mod auth;
mod components {
    pub mod admissions;
    pub mod dashboard;
    pub mod form;
    pub mod layout;
    pub mod login;
    pub mod notice;
    pub mod pager;
    pub mod product_requests;
    pub mod receptions;
    pub mod reports;
}
mod theme;
mod web;

use crate::auth::{AuthContext, init_auth};
use crate::components::admissions::AdmissionsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::layout::Shell;
use crate::components::login::LoginPage;
use crate::components::notice::{NoticeArea, NoticeContext};
use crate::components::product_requests::ProductRequestsPage;
use crate::components::receptions::ReceptionsPage;
use crate::components::reports::ReportsPage;
use crate::theme::init_theme;
use crate::web::router::{Router, RouterOutlet};

use dinawin::{AppRoute, ClientConfig};
use leptos::prelude::*;

/// Proxy prefix baked in at build time, e.g.
/// `DINAWIN_API_BASE_URL=https://api.example trunk build`.
fn client_config() -> ClientConfig {
    ClientConfig::from_option(option_env!("DINAWIN_API_BASE_URL"))
}

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <Shell><DashboardPage /></Shell> }.into_any(),
        AppRoute::Admissions => view! { <Shell><AdmissionsPage /></Shell> }.into_any(),
        AppRoute::Receptions => view! { <Shell><ReceptionsPage /></Shell> }.into_any(),
        AppRoute::ProductRequests => {
            view! { <Shell><ProductRequestsPage /></Shell> }.into_any()
        }
        AppRoute::Reports => view! { <Shell><ReportsPage /></Shell> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="not-found">
                <h1>"404"</h1>
                <p>"Page not found"</p>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let auth_ctx = AuthContext::new(client_config());
    init_auth(&auth_ctx);
    let is_authenticated = auth_ctx.is_authenticated_signal();
    provide_context(auth_ctx);

    provide_context(init_theme());
    provide_context(NoticeContext::new());

    view! {
        <NoticeArea />
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
