use crate::auth::use_api;
use crate::components::form::non_blank;
use crate::components::notice::use_notice;
use crate::components::pager::Pager;
use dinawin::LatestRequest;
use dinawin::shared::protocol::AdmissionQuery;
use dinawin::shared::{Admission, NewAdmission, Page};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn AdmissionsPage() -> impl IntoView {
    let api = use_api();
    let notice = use_notice();

    let query = RwSignal::new(AdmissionQuery::default());
    let refresh = RwSignal::new(0u32);
    let (page, set_page) = signal(Page::<Admission>::default());
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
                let result = api.admissions(&current).await;
                // A newer filter or page change owns the table now.
                if !latest.is_current(ticket) {
                    return;
                }
                match result {
                    Ok(data) => set_page.set(data),
                    Err(e) => notice.error(format!("Failed to load admissions: {}", e.user_message())),
                }
                set_loading.set(false);
            });
        }
    });
    let reload = move || refresh.update(|n| *n += 1);

    // Filters
    let search = RwSignal::new(String::new());
    let on_search = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        query.update(|q| {
            q.page = 1;
            q.search_text = non_blank(&search.get_untracked());
        });
    };
    let on_filter = move |ev: leptos::ev::Event| {
        let is_discharged = match event_target_value(&ev).as_str() {
            "open" => Some(false),
            "discharged" => Some(true),
            _ => None,
        };
        query.update(|q| {
            q.page = 1;
            q.is_discharged = is_discharged;
        });
    };

    // Create form
    let plate_number = RwSignal::new(String::new());
    let vehicle_model = RwSignal::new(String::new());
    let customer_name = RwSignal::new(String::new());
    let customer_mobile = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let (saving, set_saving) = signal(false);

    let on_create = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let admission = NewAdmission {
                plate_number: plate_number.get().trim().to_string(),
                vehicle_model: vehicle_model.get().trim().to_string(),
                customer_name: customer_name.get().trim().to_string(),
                customer_mobile: customer_mobile.get().trim().to_string(),
                description: non_blank(&description.get()),
            };
            let api = api.clone();
            set_saving.set(true);
            spawn_local(async move {
                match api.create_admission(&admission).await {
                    Ok(created) => {
                        notice.success(format!("Admitted {}", created.plate_number));
                        for field in [plate_number, vehicle_model, customer_name, customer_mobile, description] {
                            field.set(String::new());
                        }
                        reload();
                    }
                    Err(e) => notice.error(e.user_message()),
                }
                set_saving.set(false);
            });
        }
    };

    let on_discharge = Callback::new({
        let api = api.clone();
        move |id: i64| {
            let api = api.clone();
            spawn_local(async move {
                match api.discharge_admission(id).await {
                    Ok(()) => {
                        notice.success("Vehicle discharged");
                        reload();
                    }
                    Err(e) => notice.error(e.user_message()),
                }
            });
        }
    });

    let on_delete = Callback::new({
        let api = api.clone();
        move |id: i64| {
            let api = api.clone();
            spawn_local(async move {
                match api.delete_admission(id).await {
                    Ok(()) => {
                        notice.success("Admission deleted");
                        set_page.update(|p| p.items.retain(|a| a.id != id));
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
                <h1>"Admissions"</h1>
            </header>

            <form class="card form-grid" on:submit=on_create>
                <h2>"New admission"</h2>
                <input placeholder="Plate number" bind:value=plate_number />
                <input placeholder="Vehicle model" bind:value=vehicle_model />
                <input placeholder="Customer name" bind:value=customer_name />
                <input placeholder="Customer mobile" bind:value=customer_mobile />
                <input placeholder="Description" bind:value=description />
                <button class="btn btn-primary" type="submit" disabled=move || saving.get()>
                    "Admit"
                </button>
            </form>

            <div class="toolbar">
                <form on:submit=on_search>
                    <input type="search" placeholder="Plate, customer..." bind:value=search />
                    <button class="btn" type="submit">"Search"</button>
                </form>
                <select on:change=on_filter>
                    <option value="all">"All"</option>
                    <option value="open">"In shop"</option>
                    <option value="discharged">"Discharged"</option>
                </select>
            </div>

            <table class="table">
                <thead>
                    <tr>
                        <th>"Plate"</th>
                        <th>"Vehicle"</th>
                        <th>"Customer"</th>
                        <th>"Admitted"</th>
                        <th>"Status"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || !loading.get() && page.with(|p| p.items.is_empty())>
                        <tr>
                            <td colspan="6" class="empty">"No admissions found."</td>
                        </tr>
                    </Show>
                    <For
                        each=move || page.get().items
                        key=|a| a.id
                        children=move |admission| {
                            let id = admission.id;
                            let is_discharged = admission.is_discharged;
                            view! {
                                <tr>
                                    <td class="mono">{admission.plate_number}</td>
                                    <td>{admission.vehicle_model}</td>
                                    <td>
                                        {admission.customer_name} <br />
                                        <span class="muted">{admission.customer_mobile}</span>
                                    </td>
                                    <td>{admission.admitted_at.format("%Y-%m-%d %H:%M").to_string()}</td>
                                    <td>
                                        {if is_discharged { "Discharged" } else { "In shop" }}
                                    </td>
                                    <td class="actions">
                                        <Show when=move || !is_discharged>
                                            <button class="btn btn-sm" on:click=move |_| on_discharge.run(id)>
                                                "Discharge"
                                            </button>
                                        </Show>
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
