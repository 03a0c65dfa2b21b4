use crate::fortune::Theme;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Reads the wheel colors from the current GTK theme.
pub fn from_context(context: &gtk::StyleContext) -> Theme {
    let fallback = Theme::default();
    Theme {
        primary: lookup_color(context, "theme_selected_bg_color", fallback.primary),
        background: lookup_color(context, "theme_bg_color", fallback.background),
        on_primary: lookup_color(context, "theme_selected_fg_color", fallback.on_primary),
    }
}

fn lookup_color(context: &gtk::StyleContext, name: &str, fallback: Srgba<f64>) -> Srgba<f64> {
    context
        .lookup_color(name)
        .map(|c| {
            Srgba::new(
                c.red() as f64,
                c.green() as f64,
                c.blue() as f64,
                c.alpha() as f64,
            )
        })
        .unwrap_or(fallback)
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.fortune-area {
    background: none;
    background-color: transparent;
}

.fortune-status {
    font-weight: bold;
    padding: 6px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
