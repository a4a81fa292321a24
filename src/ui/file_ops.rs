use crate::acquisition::{first_offered, Candidate};
use crate::ui::view::{refresh, Session, Widgets};
use anyhow::{Context, Result};
use gtk4::gdk;
use gtk4::gio;
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{Button, DropTarget, FileDialog, FileFilter, PropagationPhase};

/// Content type guessed from the file name alone. GIO's plain
/// `standard::content-type` may read the file to settle the type, which
/// would accept a mislabelled image on its bytes.
const NAME_ONLY_CONTENT_TYPE: &str = "standard::fast-content-type";

/// Reads a `gio::File` into a candidate, taking the declared media type from
/// the file's name.
pub async fn load_candidate(file: &gio::File) -> Result<Candidate> {
    let info = file
        .query_info_future(
            "standard::fast-content-type,standard::display-name",
            gio::FileQueryInfoFlags::NONE,
            glib::Priority::DEFAULT,
        )
        .await
        .with_context(|| format!("Failed to query {}", file.uri()))?;

    let name = info.display_name().to_string();
    let media_type = info
        .attribute_string(NAME_ONLY_CONTENT_TYPE)
        .map(|content_type| {
            gio::content_type_get_mime_type(content_type.as_str())
                .map(|mime| mime.to_string())
                .unwrap_or_else(|| content_type.to_string())
        })
        .unwrap_or_default();

    let (bytes, _etag) = file
        .load_contents_future()
        .await
        .with_context(|| format!("Failed to read {}", name))?;

    Ok(Candidate {
        name,
        media_type,
        bytes: bytes.to_vec(),
    })
}

/// Funnels offered files into the workflow; only the first is used.
pub fn submit_files(files: Vec<gio::File>, widgets: &Widgets, session: &Session) {
    let Some(file) = first_offered(files) else {
        return;
    };

    let widgets = widgets.clone();
    let session = session.clone();
    glib::MainContext::default().spawn_local(async move {
        match load_candidate(&file).await {
            Ok(candidate) => {
                let outcome = session
                    .workflow
                    .borrow_mut()
                    .submit_candidate(Some(candidate));
                tracing::debug!("Submission outcome: {:?}", outcome);
            }
            Err(e) => {
                tracing::error!("{:#}", e);
                widgets
                    .toast_overlay
                    .add_toast(adw::Toast::new("Could not read the selected file."));
            }
        }
        refresh(&widgets, &session);
    });
}

/// Connects a button to the image file picker.
pub fn connect_open_dialog(button: &Button, widgets: &Widgets, session: &Session) {
    let widgets = widgets.clone();
    let session = session.clone();
    button.connect_clicked(move |_| {
        let filter = FileFilter::new();
        filter.set_name(Some("Images"));
        filter.add_mime_type("image/*");

        let dialog = FileDialog::builder()
            .title("Open Blueprint")
            .accept_label("Open")
            .modal(true)
            .default_filter(&filter)
            .build();

        let parent = widgets.window.clone();
        let widgets = widgets.clone();
        let session = session.clone();
        dialog.open(
            Some(&parent),
            None::<&gio::Cancellable>,
            move |result| match result {
                Ok(file) => submit_files(vec![file], &widgets, &session),
                Err(e) => tracing::debug!("File dialog closed: {}", e),
            },
        );
    });
}

/// Accepts file drops anywhere on `target`.
///
/// The controller runs in the capture phase so a drop over the results page
/// reaches the workflow instead of making the web view navigate to the file.
pub fn connect_drop_target(target: &impl IsA<gtk4::Widget>, widgets: &Widgets, session: &Session) {
    let drop_target = DropTarget::new(gdk::FileList::static_type(), gdk::DragAction::COPY);
    drop_target.set_propagation_phase(PropagationPhase::Capture);

    let widgets = widgets.clone();
    let session = session.clone();
    drop_target.connect_drop(move |_, value, _, _| match value.get::<gdk::FileList>() {
        Ok(list) => {
            submit_files(list.files(), &widgets, &session);
            true
        }
        Err(e) => {
            tracing::warn!("Unsupported drop payload: {}", e);
            false
        }
    });

    target.add_controller(drop_target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::validate_candidate;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn load(path: &std::path::Path) -> Candidate {
        let file = gio::File::for_path(path);
        let context = glib::MainContext::new();
        context
            .with_thread_default(|| context.block_on(load_candidate(&file)))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_extensionless_png_is_not_typed_from_its_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan");
        std::fs::write(&path, PNG_MAGIC).unwrap();

        let candidate = load(&path);
        assert_eq!(candidate.name, "plan");
        assert_eq!(candidate.bytes, PNG_MAGIC);
        assert!(!candidate.media_type.starts_with("image/"));
        assert!(validate_candidate(candidate).is_err());
    }
}
