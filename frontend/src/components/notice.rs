//! Transient notice shown after an action succeeds or fails.

use leptos::prelude::*;
use std::time::Duration;

const NOTICE_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

#[derive(Clone, Copy)]
pub struct NoticeContext {
    current: RwSignal<Option<Notice>>,
}

impl NoticeContext {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), false);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message.into(), true);
    }

    pub fn dismiss(&self) {
        self.current.set(None);
    }

    fn show(&self, message: String, is_error: bool) {
        if is_error {
            log::warn!("notice: {}", message);
        }
        let notice = Notice { message, is_error };
        self.current.set(Some(notice.clone()));

        // Only clear if a newer notice has not replaced this one.
        let current = self.current;
        set_timeout(
            move || {
                if current.get_untracked().as_ref() == Some(&notice) {
                    current.set(None);
                }
            },
            NOTICE_TIMEOUT,
        );
    }
}

impl Default for NoticeContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_notice() -> NoticeContext {
    use_context::<NoticeContext>().expect("NoticeContext should be provided")
}

#[component]
pub fn NoticeArea() -> impl IntoView {
    let ctx = use_notice();
    move || {
        ctx.current.get().map(|notice| {
            let class = if notice.is_error {
                "notice notice-error"
            } else {
                "notice notice-success"
            };
            view! {
                <div class=class role="status">
                    <span>{notice.message}</span>
                    <button class="notice-close" on:click=move |_| ctx.dismiss()>"×"</button>
                </div>
            }
        })
    }
}
