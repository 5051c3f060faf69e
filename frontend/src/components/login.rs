use crate::auth::{forget_username, login, use_auth};
use crate::theme::{toggle_theme, use_theme};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let theme = use_theme();

    let username = RwSignal::new(auth.last_username.get_untracked());
    let password = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = {
        let auth = auth.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if username.get().trim().is_empty() || password.get().is_empty() {
                set_error_msg.set(Some("Please enter username and password.".to_string()));
                return;
            }

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let auth = auth.clone();
            spawn_local(async move {
                // On success the router leaves this page on its own.
                if let Err(message) = login(&auth, username.get_untracked(), password.get_untracked()).await {
                    set_error_msg.set(Some(message));
                    password.set(String::new());
                }
                set_is_submitting.set(false);
            });
        }
    };

    let on_forget = move |_| {
        forget_username(&auth);
        username.set(String::new());
    };

    view! {
        <div class="login">
            <div class="card">
                <h1>"Dinawin"</h1>
                <p class="muted">"Repair shop administration"</p>

                <form on:submit=on_submit>
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error">
                            {move || error_msg.get().unwrap_or_default()}
                        </div>
                    </Show>

                    <label for="username">"Username"</label>
                    <input
                        id="username"
                        type="text"
                        autocomplete="username"
                        bind:value=username
                        required
                    />

                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        type="password"
                        autocomplete="current-password"
                        bind:value=password
                        required
                    />

                    <button class="btn btn-primary" type="submit" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>

                <div class="login-footer">
                    <button class="btn btn-link" on:click=on_forget>"Forget me"</button>
                    <button class="btn btn-link" on:click=move |_| toggle_theme(theme)>"Toggle theme"</button>
                </div>
            </div>
        </div>
    }
}
