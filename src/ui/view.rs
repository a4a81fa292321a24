use crate::api::AnalysisService;
use crate::presenter::{present, render_page, DisplayMode, Theme};
use crate::state::{ErrorNotice, WorkflowState};
use adw::prelude::*;
use adw::{ApplicationWindow, Toast, ToastOverlay, WindowTitle};
use gtk4::{Button, Spinner, Stack};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use webkit6::prelude::*;
use webkit6::WebView;

pub const UPLOAD_PAGE: &str = "upload";
pub const RESULTS_PAGE: &str = "results";

/// Workflow state plus the collaborators every handler needs.
#[derive(Clone)]
pub struct Session {
    pub workflow: Rc<RefCell<WorkflowState>>,
    pub service: Arc<dyn AnalysisService>,
    pub theme: Rc<Cell<Theme>>,
}

/// Widgets touched when the render model changes.
#[derive(Clone)]
pub struct Widgets {
    pub window: ApplicationWindow,
    pub title: WindowTitle,
    pub toast_overlay: ToastOverlay,
    pub stack: Stack,
    pub web_view: WebView,
    pub analyze_btn: Button,
    pub reset_btn: Button,
    pub spinner: Spinner,
    /// Toast currently showing the workflow error, keyed by notice serial.
    pub shown_error: Rc<RefCell<Option<(u64, Toast)>>>,
}

/// Picks the configured theme, or follows the desktop colour scheme.
pub fn resolve_theme(configured: Option<Theme>) -> Theme {
    configured.unwrap_or_else(|| {
        if adw::StyleManager::default().is_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    })
}

/// Re-derives the render model and applies it to the widgets.
pub fn refresh(widgets: &Widgets, session: &Session) {
    let model = present(&session.workflow.borrow());

    widgets
        .title
        .set_subtitle(model.file_name.as_deref().unwrap_or(""));
    widgets.analyze_btn.set_visible(model.mode != DisplayMode::Upload);
    widgets.analyze_btn.set_sensitive(model.can_analyze);
    widgets.reset_btn.set_visible(model.can_reset);
    widgets.reset_btn.set_sensitive(model.can_reset);

    widgets.spinner.set_visible(model.show_progress);
    if model.show_progress {
        widgets.spinner.start();
    } else {
        widgets.spinner.stop();
    }

    let html = render_page(&model, session.theme.get());
    widgets.web_view.load_html(&html, None);
    if model.mode == DisplayMode::Upload {
        widgets.stack.set_visible_child_name(UPLOAD_PAGE);
    } else {
        widgets.stack.set_visible_child_name(RESULTS_PAGE);
    }

    sync_error_toast(widgets, session, model.error.as_ref());
}

/// Keeps exactly one toast up for the current error notice.
fn sync_error_toast(widgets: &Widgets, session: &Session, notice: Option<&ErrorNotice>) {
    let shown_serial = widgets.shown_error.borrow().as_ref().map(|(serial, _)| *serial);
    if shown_serial == notice.map(|n| n.serial) {
        return;
    }

    // Release the borrow before dismissing; the dismissed handler re-enters.
    let previous = widgets.shown_error.borrow_mut().take();
    if let Some((_, toast)) = previous {
        toast.dismiss();
    }

    let Some(notice) = notice else {
        return;
    };

    let toast = Toast::builder()
        .title(notice.message.as_str())
        .timeout(0)
        .priority(adw::ToastPriority::High)
        .build();

    let serial = notice.serial;
    let handler_widgets = widgets.clone();
    let handler_session = session.clone();
    toast.connect_dismissed(move |_| {
        {
            let mut shown = handler_widgets.shown_error.borrow_mut();
            if matches!(shown.as_ref(), Some((s, _)) if *s == serial) {
                *shown = None;
            }
        }
        let cleared = handler_session.workflow.borrow_mut().dismiss_error(serial);
        if cleared {
            tracing::debug!("Error notice {} dismissed", serial);
            refresh(&handler_widgets, &handler_session);
        }
    });

    widgets.toast_overlay.add_toast(toast.clone());
    *widgets.shown_error.borrow_mut() = Some((serial, toast));
}
