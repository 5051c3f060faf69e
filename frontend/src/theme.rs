//! Light/dark theme, persisted under the `theme` localStorage key.

use crate::web::LocalStorage;
use dinawin::Theme;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: RwSignal<Theme>,
}

/// Sets `data-theme` on `<html>`.
fn apply(theme: Theme) {
    if let Some(root) = document().document_element() {
        let _ = root.set_attribute("data-theme", theme.as_str());
    }
}

/// Loads the stored preference and applies it before the first render.
pub fn init_theme() -> ThemeContext {
    let theme = Theme::load(&LocalStorage);
    apply(theme);
    ThemeContext {
        theme: RwSignal::new(theme),
    }
}

pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>().expect("ThemeContext should be provided")
}

pub fn toggle_theme(ctx: ThemeContext) {
    let next = ctx.theme.get_untracked().toggle(&LocalStorage);
    apply(next);
    ctx.theme.set(next);
}
