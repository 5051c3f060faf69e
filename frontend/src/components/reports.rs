use crate::auth::use_api;
use crate::components::notice::use_notice;
use chrono::{Duration, Local, NaiveDate};
use dinawin::LatestRequest;
use dinawin::shared::{ReceptionReportRow, ReportRange};
use leptos::prelude::*;
use leptos::task::spawn_local;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_SPAN_DAYS: i64 = 30;

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

#[component]
pub fn ReportsPage() -> impl IntoView {
    let api = use_api();
    let notice = use_notice();

    let today = Local::now().date_naive();
    let from = RwSignal::new((today - Duration::days(DEFAULT_SPAN_DAYS)).format(DATE_FORMAT).to_string());
    let to = RwSignal::new(today.format(DATE_FORMAT).to_string());

    let (rows, set_rows) = signal(Vec::<ReceptionReportRow>::new());
    let (loading, set_loading) = signal(false);

    let latest = LatestRequest::new();
    let run = move || {
        let (Some(from), Some(to)) = (parse_date(&from.get_untracked()), parse_date(&to.get_untracked()))
        else {
            notice.error("Pick both dates");
            return;
        };
        let api = api.clone();
        let latest = latest.clone();
        let ticket = latest.begin();
        set_loading.set(true);
        spawn_local(async move {
            let result = api.reception_report(ReportRange { from, to }).await;
            if !latest.is_current(ticket) {
                return;
            }
            match result {
                Ok(data) => set_rows.set(data),
                Err(e) => notice.error(e.user_message()),
            }
            set_loading.set(false);
        });
    };
    run();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        run();
    };

    let total_wage = move || rows.with(|r| {
        r.iter()
            .fold(0u64, |total, row| total.saturating_add(row.total_wage))
    });

    view! {
        <section class="page">
            <header class="page-header">
                <h1>"Reception report"</h1>
            </header>

            <form class="toolbar" on:submit=on_submit>
                <label>"From" <input type="date" bind:value=from /></label>
                <label>"To" <input type="date" bind:value=to /></label>
                <button class="btn btn-primary" type="submit" disabled=move || loading.get()>
                    "Run"
                </button>
            </form>

            <table class="table">
                <thead>
                    <tr>
                        <th>"Mechanic"</th>
                        <th>"Receptions"</th>
                        <th>"Total wage"</th>
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || !loading.get() && rows.with(Vec::is_empty)>
                        <tr>
                            <td colspan="3" class="empty">"Nothing in this range."</td>
                        </tr>
                    </Show>
                    <For
                        each=move || rows.get()
                        key=|row| row.mechanic_name.clone()
                        children=|row| {
                            view! {
                                <tr>
                                    <td>{row.mechanic_name}</td>
                                    <td>{row.reception_count}</td>
                                    <td class="mono">{row.total_wage}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
                <tfoot>
                    <tr>
                        <th colspan="2">"Total"</th>
                        <th class="mono">{total_wage}</th>
                    </tr>
                </tfoot>
            </table>
        </section>
    }
}
