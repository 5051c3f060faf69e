use crate::auth::use_api;
use crate::components::form::{non_blank, parse_id};
use crate::components::notice::use_notice;
use crate::components::pager::Pager;
use dinawin::LatestRequest;
use dinawin::shared::protocol::ProductRequestQuery;
use dinawin::shared::{NewProductRequest, Page, ProductRequest, ProductRequestStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ProductRequestsPage() -> impl IntoView {
    let api = use_api();
    let notice = use_notice();

    let query = RwSignal::new(ProductRequestQuery::default());
    let refresh = RwSignal::new(0u32);
    let (page, set_page) = signal(Page::<ProductRequest>::default());
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
                let result = api.product_requests(&current).await;
                // A newer filter or page change owns the table now.
                if !latest.is_current(ticket) {
                    return;
                }
                match result {
                    Ok(data) => set_page.set(data),
                    Err(e) => notice.error(format!(
                        "Failed to load product requests: {}",
                        e.user_message()
                    )),
                }
                set_loading.set(false);
            });
        }
    });
    let reload = move || refresh.update(|n| *n += 1);

    let on_status_filter = move |ev: leptos::ev::Event| {
        let status = ProductRequestStatus::parse(&event_target_value(&ev));
        query.update(|q| {
            q.page = 1;
            q.status = status;
        });
    };

    let reception_id = RwSignal::new(String::new());
    let product_name = RwSignal::new(String::new());
    let quantity = RwSignal::new("1".to_string());
    let note = RwSignal::new(String::new());

    let on_create = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let Some(reception) = parse_id(&reception_id.get()) else {
                notice.error("Reception id must be a positive number");
                return;
            };
            let Ok(count) = quantity.get().trim().parse::<u32>() else {
                notice.error("Quantity must be a whole number");
                return;
            };
            let request = NewProductRequest {
                reception_id: reception,
                product_name: product_name.get().trim().to_string(),
                quantity: count,
                note: non_blank(&note.get()),
            };

            let api = api.clone();
            spawn_local(async move {
                match api.create_product_request(&request).await {
                    Ok(created) => {
                        notice.success(format!("Requested {}", created.product_name));
                        product_name.set(String::new());
                        quantity.set("1".to_string());
                        note.set(String::new());
                        reload();
                    }
                    Err(e) => notice.error(e.user_message()),
                }
            });
        }
    };

    let on_set_status = Callback::new({
        let api = api.clone();
        move |(id, status): (i64, ProductRequestStatus)| {
            let api = api.clone();
            spawn_local(async move {
                match api.set_product_request_status(id, status, None).await {
                    Ok(updated) => {
                        notice.success(format!("Request #{} {}", updated.id, updated.status.as_str()));
                        set_page.update(|p| {
                            if let Some(item) = p.items.iter_mut().find(|r| r.id == updated.id) {
                                *item = updated;
                            }
                        });
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
                match api.delete_product_request(id).await {
                    Ok(()) => {
                        notice.success("Product request deleted");
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
                <h1>"Product requests"</h1>
            </header>

            <form class="card form-grid" on:submit=on_create>
                <h2>"New request"</h2>
                <input placeholder="Reception id" inputmode="numeric" bind:value=reception_id />
                <input placeholder="Product" bind:value=product_name />
                <input placeholder="Quantity" inputmode="numeric" bind:value=quantity />
                <input placeholder="Note" bind:value=note />
                <button class="btn btn-primary" type="submit">"Request"</button>
            </form>

            <div class="toolbar">
                <select on:change=on_status_filter>
                    <option value="">"Any status"</option>
                    {ProductRequestStatus::ALL
                        .into_iter()
                        .map(|status| view! { <option value=status.as_str()>{status.as_str()}</option> })
                        .collect_view()}
                </select>
            </div>

            <table class="table">
                <thead>
                    <tr>
                        <th>"#"</th>
                        <th>"Reception"</th>
                        <th>"Product"</th>
                        <th>"Qty"</th>
                        <th>"Status"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || !loading.get() && page.with(|p| p.items.is_empty())>
                        <tr>
                            <td colspan="6" class="empty">"No product requests."</td>
                        </tr>
                    </Show>
                    // Keyed on status too so a transition re-renders the row.
                    <For
                        each=move || page.get().items
                        key=|r| (r.id, r.status)
                        children=move |request| {
                            let id = request.id;
                            let status = request.status;
                            view! {
                                <tr>
                                    <td>{id}</td>
                                    <td>{request.reception_id}</td>
                                    <td>
                                        {request.product_name} <br />
                                        <span class="muted">{request.note.unwrap_or_default()}</span>
                                    </td>
                                    <td>{request.quantity}</td>
                                    <td>
                                        <span class="badge">{status.as_str()}</span>
                                    </td>
                                    <td class="actions">
                                        <Show when=move || status.is_open()>
                                            <button
                                                class="btn btn-sm btn-success"
                                                on:click=move |_| on_set_status.run((id, ProductRequestStatus::Approved))
                                            >
                                                "Approve"
                                            </button>
                                            <button
                                                class="btn btn-sm"
                                                on:click=move |_| on_set_status.run((id, ProductRequestStatus::Rejected))
                                            >
                                                "Reject"
                                            </button>
                                        </Show>
                                        <Show when=move || status == ProductRequestStatus::Approved>
                                            <button
                                                class="btn btn-sm"
                                                on:click=move |_| on_set_status.run((id, ProductRequestStatus::Delivered))
                                            >
                                                "Delivered"
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
