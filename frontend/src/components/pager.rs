use leptos::prelude::*;

/// Previous/next controls for a 1-based page number.
#[component]
pub fn Pager(
    page: Signal<u32>,
    total_pages: Signal<u64>,
    has_next: Signal<bool>,
    on_change: Callback<u32>,
) -> impl IntoView {
    view! {
        <div class="pager">
            <button
                class="btn btn-sm"
                disabled=move || page.get() <= 1
                on:click=move |_| on_change.run(page.get_untracked().saturating_sub(1).max(1))
            >
                "Previous"
            </button>
            <span class="pager-label">
                {move || format!("Page {} of {}", page.get(), total_pages.get().max(1))}
            </span>
            <button
                class="btn btn-sm"
                disabled=move || !has_next.get()
                on:click=move |_| on_change.run(page.get_untracked() + 1)
            >
                "Next"
            </button>
        </div>
    }
}
