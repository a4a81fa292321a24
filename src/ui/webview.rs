use gtk4::ScrolledWindow;
use webkit6::prelude::*;
use webkit6::WebView;

/// Creates the WebKit WebView that hosts the rendered results page and its
/// scrolled window container.
pub fn create_results_view() -> (WebView, ScrolledWindow) {
    let web_view = WebView::new();
    if let Some(settings) = webkit6::prelude::WebViewExt::settings(&web_view) {
        // Static markup only.
        settings.set_enable_javascript(false);
        settings.set_enable_developer_extras(false);
    }
    let results_scroll = ScrolledWindow::builder()
        .child(&web_view)
        .hexpand(true)
        .vexpand(true)
        .build();
    (web_view, results_scroll)
}
