use adw::StatusPage;
use gtk4::prelude::WidgetExt;
use gtk4::Button;

/// Creates the upload target shown while no blueprint is selected.
pub fn create_drop_zone() -> (StatusPage, Button) {
    let choose_btn = Button::builder()
        .label("Choose Image…")
        .halign(gtk4::Align::Center)
        .build();
    choose_btn.add_css_class("pill");
    choose_btn.add_css_class("suggested-action");

    let page = StatusPage::builder()
        .icon_name("folder-pictures-symbolic")
        .title("Drop blueprint here")
        .description("or click to upload an image")
        .child(&choose_btn)
        .vexpand(true)
        .hexpand(true)
        .build();

    (page, choose_btn)
}
