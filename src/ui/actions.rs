use crate::orchestrator::run_analysis;
use crate::ui::view::{refresh, Session, Widgets};
use gtk4::glib;
use gtk4::prelude::ButtonExt;
use gtk4::Button;

/// Runs the analysis on click. The button is insensitive while a request is
/// in flight, but a second run would simply supersede the first.
pub fn connect_analyze(button: &Button, widgets: &Widgets, session: &Session) {
    let widgets = widgets.clone();
    let session = session.clone();
    button.connect_clicked(move |_| {
        let widgets = widgets.clone();
        let session = session.clone();
        glib::MainContext::default().spawn_local(async move {
            let outcome = run_analysis(&session.workflow, session.service.as_ref(), || {
                refresh(&widgets, &session)
            })
            .await;
            tracing::debug!("Analysis run finished: {:?}", outcome);
            refresh(&widgets, &session);
        });
    });
}

/// Returns the workflow to its initial state.
pub fn connect_reset(button: &Button, widgets: &Widgets, session: &Session) {
    let widgets = widgets.clone();
    let session = session.clone();
    button.connect_clicked(move |_| {
        session.workflow.borrow_mut().reset();
        refresh(&widgets, &session);
    });
}
