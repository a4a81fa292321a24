use adw::{HeaderBar, WindowTitle};
use gtk4::prelude::WidgetExt;
use gtk4::{Button, Spinner};

use crate::constants::APP_NAME;

/// Creates the application header bar with the open, analyze and reset
/// actions and the progress spinner.
pub fn create_header_bar() -> (HeaderBar, WindowTitle, Button, Button, Button, Spinner) {
    let header_bar = HeaderBar::new();
    let view_title = WindowTitle::new(APP_NAME, "");
    header_bar.set_title_widget(Some(&view_title));

    let open_btn = Button::builder()
        .icon_name("document-open-symbolic")
        .tooltip_text("Open Blueprint")
        .build();

    let reset_btn = Button::builder()
        .label("Upload Different File")
        .tooltip_text("Clear the current blueprint and results")
        .visible(false)
        .build();

    let analyze_btn = Button::builder()
        .label("Analyze Blueprint")
        .tooltip_text("Send the blueprint to the analysis service")
        .sensitive(false)
        .visible(false)
        .build();
    analyze_btn.add_css_class("suggested-action");

    let spinner = Spinner::new();
    spinner.set_margin_end(8);
    spinner.set_visible(false);

    header_bar.pack_start(&open_btn);
    header_bar.pack_start(&reset_btn);
    header_bar.pack_end(&analyze_btn);
    header_bar.pack_end(&spinner);

    (header_bar, view_title, open_btn, analyze_btn, reset_btn, spinner)
}
