use crate::auth::{use_api, use_auth};
use crate::components::notice::use_notice;
use dinawin::shared::DashboardSummary;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = use_api();
    let notice = use_notice();
    let user = use_auth().user_signal();

    let (summary, set_summary) = signal(Option::<DashboardSummary>::None);
    let (loading, set_loading) = signal(true);

    let load = move || {
        let api = api.clone();
        set_loading.set(true);
        spawn_local(async move {
            match api.dashboard_summary().await {
                Ok(data) => set_summary.set(Some(data)),
                Err(e) => notice.error(format!("Failed to load summary: {}", e.user_message())),
            }
            set_loading.set(false);
        });
    };
    load();

    let greeting = move || {
        user.get()
            .map(|u| format!("Welcome, {}", u.display_name()))
            .unwrap_or_default()
    };

    view! {
        <section class="page">
            <header class="page-header">
                <h1>"Dashboard"</h1>
                <p class="muted">{greeting}</p>
            </header>

            <Show
                when=move || !loading.get()
                fallback=|| view! { <div class="loading">"Loading..."</div> }
            >
                {move || {
                    summary
                        .get()
                        .map(|s| {
                            view! {
                                <div class="stats">
                                    <StatCard label="Open admissions" value=s.open_admissions />
                                    <StatCard label="Discharged today" value=s.discharged_today />
                                    <StatCard label="Open receptions" value=s.open_receptions />
                                    <StatCard
                                        label="Pending product requests"
                                        value=s.pending_product_requests
                                    />
                                </div>
                            }
                        })
                }}
            </Show>
        </section>
    }
}

#[component]
fn StatCard(label: &'static str, value: u64) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{label}</div>
            <div class="stat-value">{value}</div>
        </div>
    }
}
