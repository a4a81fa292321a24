mod acquisition;
mod api;
mod blob;
mod config;
mod constants;
mod orchestrator;
mod presenter;
mod state;
mod ui;

use adw::prelude::*;
use adw::{Application, ApplicationWindow, ToastOverlay};
use gtk4::{glib, Orientation, Stack, StackTransitionType};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crate::api::{AnalysisService, HttpAnalysisService};
use crate::blob::BlobRegistry;
use crate::config::AppConfig;
use crate::constants::{APP_ID, APP_NAME, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::state::WorkflowState;
use crate::ui::view::{refresh, resolve_theme, Session, Widgets, RESULTS_PAGE, UPLOAD_PAGE};

#[tokio::main]
async fn main() -> glib::ExitCode {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!(
        "Analysis endpoint: {} (timeout {}s)",
        config.analyze_url(),
        config.request_timeout.as_secs()
    );

    let service: Arc<dyn AnalysisService> = match HttpAnalysisService::new(&config) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            tracing::error!("Cannot start: {}", e);
            return glib::ExitCode::FAILURE;
        }
    };

    let app = Application::builder().application_id(APP_ID).build();
    app.connect_activate(move |app| build_ui(app, &config, service.clone()));
    app.run()
}

fn build_ui(app: &Application, config: &AppConfig, service: Arc<dyn AnalysisService>) {
    let window = ApplicationWindow::builder()
        .application(app)
        .default_width(DEFAULT_WINDOW_WIDTH)
        .default_height(DEFAULT_WINDOW_HEIGHT)
        .title(APP_NAME)
        .build();

    let toast_overlay = ToastOverlay::new();
    window.set_content(Some(&toast_overlay));

    let content_box = gtk4::Box::new(Orientation::Vertical, 0);
    toast_overlay.set_child(Some(&content_box));

    let (header_bar, view_title, open_btn, analyze_btn, reset_btn, spinner) =
        ui::header::create_header_bar();
    content_box.append(&header_bar);

    let (drop_page, choose_btn) = ui::drop_zone::create_drop_zone();
    let (web_view, results_scroll) = ui::webview::create_results_view();

    let stack = Stack::builder()
        .transition_type(StackTransitionType::Crossfade)
        .hexpand(true)
        .vexpand(true)
        .build();
    stack.add_named(&drop_page, Some(UPLOAD_PAGE));
    stack.add_named(&results_scroll, Some(RESULTS_PAGE));
    content_box.append(&stack);

    let widgets = Widgets {
        window: window.clone(),
        title: view_title,
        toast_overlay,
        stack: stack.clone(),
        web_view,
        analyze_btn: analyze_btn.clone(),
        reset_btn: reset_btn.clone(),
        spinner,
        shown_error: Rc::default(),
    };

    let session = Session {
        workflow: Rc::new(RefCell::new(WorkflowState::new(BlobRegistry::global()))),
        service,
        theme: Rc::new(Cell::new(resolve_theme(config.theme))),
    };

    ui::file_ops::connect_open_dialog(&open_btn, &widgets, &session);
    ui::file_ops::connect_open_dialog(&choose_btn, &widgets, &session);
    ui::file_ops::connect_drop_target(&stack, &widgets, &session);
    ui::actions::connect_analyze(&analyze_btn, &widgets, &session);
    ui::actions::connect_reset(&reset_btn, &widgets, &session);

    if config.theme.is_none() {
        adw::StyleManager::default().connect_dark_notify(glib::clone!(
            #[strong]
            widgets,
            #[strong]
            session,
            move |_| {
                session.theme.set(resolve_theme(None));
                refresh(&widgets, &session);
            }
        ));
    }

    // Release the preview before the window goes away.
    window.connect_close_request(glib::clone!(
        #[strong]
        session,
        move |_| {
            session.workflow.borrow_mut().reset();
            glib::Propagation::Proceed
        }
    ));

    refresh(&widgets, &session);
    window.present();
}
