use crate::auth::{logout, use_auth};
use crate::theme::{toggle_theme, use_theme};
use crate::web::router::Link;
use dinawin::{AppRoute, Theme};
use leptos::prelude::*;

/// Navigation bar and page frame for every signed-in page.
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let theme = use_theme();
    let user = auth.user_signal();

    let display_name = move || {
        user.get()
            .map(|u| u.display_name().to_string())
            .unwrap_or_default()
    };
    let role_badge = move || match user.get() {
        Some(u) if u.is_dinawin_employee => "Staff",
        Some(_) => "Customer",
        None => "",
    };
    let theme_label = move || match theme.theme.get() {
        Theme::Light => "Dark mode",
        Theme::Dark => "Light mode",
    };

    let on_logout = move |_| logout(&auth);

    view! {
        <div class="shell">
            <nav class="navbar">
                <span class="brand">"Dinawin"</span>
                <ul class="nav-links">
                    {AppRoute::NAVIGATION
                        .into_iter()
                        .map(|route| view! { <li><Link route=route>{route.title()}</Link></li> })
                        .collect_view()}
                </ul>
                <div class="nav-user">
                    <span class="user-name">{display_name}</span>
                    <span class="badge">{role_badge}</span>
                    <button class="btn" on:click=move |_| toggle_theme(theme)>{theme_label}</button>
                    <button class="btn btn-outline" on:click=on_logout>"Sign out"</button>
                </div>
            </nav>
            <main class="page">{children()}</main>
        </div>
    }
}
