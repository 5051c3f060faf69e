use crate::auth::use_api;
use crate::components::form::{non_blank, parse_id};
use crate::components::notice::use_notice;
use crate::components::pager::Pager;
use dinawin::LatestRequest;
use dinawin::shared::protocol::ReceptionQuery;
use dinawin::shared::{NewReception, Page, Reception, ReceptionStatus, ServiceLine};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ReceptionsPage() -> impl IntoView {
    let api = use_api();
    let notice = use_notice();

    let query = RwSignal::new(ReceptionQuery::default());
    let refresh = RwSignal::new(0u32);
    let (page, set_page) = signal(Page::<Reception>::default());
    let (loading, set_loading) = signal(true);

    let latest = LatestRequest::new();
    Effect::new({
        let api = api.clone();
        move |_| {
            refresh.track();
            let current = query.get();
            let api = api.clone();
            let latest = latest.clone();
            let ticket = latest.begin();
            set_loading.set(true);
            spawn_local(async move {
                let result = api.receptions(&current).await;
                // A newer filter or page change owns the table now.
                if !latest.is_current(ticket) {
                    return;
                }
                match result {
                    Ok(data) => set_page.set(data),
                    Err(e) => notice.error(format!("Failed to load receptions: {}", e.user_message())),
                }
                set_loading.set(false);
            });
        }
    });
    let reload = move || refresh.update(|n| *n += 1);

    let search = RwSignal::new(String::new());
    let admission_filter = RwSignal::new(String::new());
    let on_search = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        query.update(|q| {
            q.page = 1;
            q.search_text = non_blank(&search.get_untracked());
            q.admission_id = parse_id(&admission_filter.get_untracked());
        });
    };
    let on_status = move |ev: leptos::ev::Event| {
        let status = ReceptionStatus::parse(&event_target_value(&ev));
        query.update(|q| {
            q.page = 1;
            q.status = status;
        });
    };

    let admission_id = RwSignal::new(String::new());
    let mechanic_name = RwSignal::new(String::new());
    let complaint = RwSignal::new(String::new());
    let service_title = RwSignal::new(String::new());
    let service_wage = RwSignal::new(String::new());

    let on_create = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let Some(admission) = parse_id(&admission_id.get()) else {
                notice.error("Admission id must be a positive number");
                return;
            };
            let services = match non_blank(&service_title.get()) {
                Some(title) => {
                    let Ok(wage) = service_wage.get().trim().parse::<u64>() else {
                        notice.error("Wage must be a whole number");
                        return;
                    };
                    vec![ServiceLine { title, wage }]
                }
                None => Vec::new(),
            };
            let reception = NewReception {
                admission_id: admission,
                mechanic_name: mechanic_name.get().trim().to_string(),
                complaint: complaint.get().trim().to_string(),
                services,
            };

            let api = api.clone();
            spawn_local(async move {
                match api.create_reception(&reception).await {
                    Ok(created) => {
                        notice.success(format!("Reception #{} opened", created.id));
                        for field in [admission_id, mechanic_name, complaint, service_title, service_wage] {
                            field.set(String::new());
                        }
                        reload();
                    }
                    Err(e) => notice.error(e.user_message()),
                }
            });
        }
    };

    let on_delete = Callback::new({
        let api = api.clone();
        move |id: i64| {
            let api = api.clone();
            spawn_local(async move {
                match api.delete_reception(id).await {
                    Ok(()) => {
                        notice.success("Reception deleted");
                        set_page.update(|p| p.items.retain(|r| r.id != id));
                    }
                    Err(e) => notice.error(e.user_message()),
                }
            });
        }
    });

    let on_page = Callback::new(move |n: u32| query.update(|q| q.page = n));

    view! {
        <section class="page">
            <header class="page-header">
                <h1>"Receptions"</h1>
            </header>

            <form class="card form-grid" on:submit=on_create>
                <h2>"New reception"</h2>
                <input placeholder="Admission id" inputmode="numeric" bind:value=admission_id />
                <input placeholder="Mechanic" bind:value=mechanic_name />
                <input placeholder="Complaint" bind:value=complaint />
                <input placeholder="Service (optional)" bind:value=service_title />
                <input placeholder="Wage" inputmode="numeric" bind:value=service_wage />
                <button class="btn btn-primary" type="submit">"Open reception"</button>
            </form>

            <div class="toolbar">
                <form on:submit=on_search>
                    <input type="search" placeholder="Mechanic, complaint..." bind:value=search />
                    <input placeholder="Admission id" inputmode="numeric" bind:value=admission_filter />
                    <button class="btn" type="submit">"Search"</button>
                </form>
                <select on:change=on_status>
                    <option value="">"Any status"</option>
                    {ReceptionStatus::ALL
                        .into_iter()
                        .map(|status| view! { <option value=status.as_str()>{status.as_str()}</option> })
                        .collect_view()}
                </select>
            </div>

            <table class="table">
                <thead>
                    <tr>
                        <th>"#"</th>
                        <th>"Admission"</th>
                        <th>"Mechanic"</th>
                        <th>"Complaint"</th>
                        <th>"Status"</th>
                        <th>"Wage"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || !loading.get() && page.with(|p| p.items.is_empty())>
                        <tr>
                            <td colspan="7" class="empty">"No receptions found."</td>
                        </tr>
                    </Show>
                    <For
                        each=move || page.get().items
                        key=|r| r.id
                        children=move |reception| {
                            let id = reception.id;
                            let total = reception.total_wage();
                            view! {
                                <tr>
                                    <td>{id}</td>
                                    <td>{reception.admission_id}</td>
                                    <td>{reception.mechanic_name}</td>
                                    <td>{reception.complaint}</td>
                                    <td>
                                        <span class="badge">{reception.status.as_str()}</span>
                                    </td>
                                    <td class="mono">{total}</td>
                                    <td class="actions">
                                        <button class="btn btn-sm btn-error" on:click=move |_| on_delete.run(id)>
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <Pager
                page=Signal::derive(move || query.with(|q| q.page))
                total_pages=Signal::derive(move || page.with(|p| p.total_pages()))
                has_next=Signal::derive(move || page.with(|p| p.has_next()))
                on_change=on_page
            />
        </section>
    }
}
