//! Result presenter: derives a render model from the workflow state and turns
//! it into the HTML page shown in the results view.

use crate::constants::ANNOTATED_IMAGE_MEDIA_TYPE;
use crate::state::{AnalysisResult, ErrorNotice, WorkflowState};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use horrorshow::helper::doctype;
use horrorshow::{html, Raw};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme {:?} (expected light or dark)", other)),
        }
    }
}

/// Which affordances are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Only the upload target.
    Upload,
    /// Preview plus the run action.
    Ready,
    /// Preview plus an indeterminate progress indicator.
    Analyzing,
    /// Preview, annotated image and summary.
    Results,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: String,
    pub count: u64,
    /// `count / max(count)`, in `0.0..=1.0`.
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub rows: Vec<SummaryRow>,
    pub total: u64,
}

impl SummaryView {
    /// Rows are ordered by count, highest first, then by label.
    pub fn from_summary<'a, I>(summary: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a u64)>,
    {
        let mut rows: Vec<SummaryRow> = summary
            .into_iter()
            .map(|(label, count)| SummaryRow {
                label: label.clone(),
                count: *count,
                scale: 0.0,
            })
            .collect();

        let total = rows.iter().map(|r| r.count).sum();
        let max = rows.iter().map(|r| r.count).max().unwrap_or(0);
        if max > 0 {
            for row in &mut rows {
                row.scale = row.count as f64 / max as f64;
            }
        }
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

        Self { rows, total }
    }

    pub fn has_detections(&self) -> bool {
        !self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// `data:` URI of the decoded annotated image.
    pub annotated_src: String,
    pub summary: SummaryView,
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            annotated_src: format!(
                "data:{};base64,{}",
                ANNOTATED_IMAGE_MEDIA_TYPE,
                STANDARD.encode(&result.annotated_image)
            ),
            summary: SummaryView::from_summary(&result.summary),
        }
    }
}

/// Everything the UI needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub mode: DisplayMode,
    pub file_name: Option<String>,
    /// Source for the original image, resolved through the blob registry.
    pub preview_src: Option<String>,
    pub can_analyze: bool,
    pub can_reset: bool,
    pub show_progress: bool,
    pub result: Option<ResultView>,
    pub error: Option<ErrorNotice>,
}

/// Pure derivation of the render model.
pub fn present(state: &WorkflowState) -> RenderModel {
    let error = state.error().cloned();

    let Some(file) = state.selected_file() else {
        return RenderModel {
            mode: DisplayMode::Upload,
            file_name: None,
            preview_src: None,
            can_analyze: false,
            can_reset: false,
            show_progress: false,
            result: None,
            error,
        };
    };

    let preview_src = state.preview().map(|handle| match handle.resolve() {
        Some(blob) => blob.to_data_uri(),
        None => handle.uri().to_string(),
    });

    let result = state.result().map(ResultView::from_result);
    let mode = if state.is_analyzing() {
        DisplayMode::Analyzing
    } else if result.is_some() {
        DisplayMode::Results
    } else {
        DisplayMode::Ready
    };

    RenderModel {
        mode,
        file_name: Some(file.name.clone()),
        preview_src,
        can_analyze: mode == DisplayMode::Ready,
        can_reset: true,
        show_progress: mode == DisplayMode::Analyzing,
        result,
        error,
    }
}

const BASE_CSS: &str = "
    body { font-family: sans-serif; margin: 0; padding: 24px; }
    h2 { margin: 0 0 16px 0; font-weight: 600; }
    .grid { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; }
    .card { border-radius: 12px; padding: 16px; }
    .badge { display: inline-block; padding: 2px 12px; border-radius: 999px; font-size: 12px; font-weight: 600; margin-bottom: 12px; }
    .card img { width: 100%; height: auto; border-radius: 6px; }
    .summary { margin-top: 24px; }
    .row { margin: 10px 0; }
    .row .head { display: flex; justify-content: space-between; font-size: 14px; }
    .bar { height: 8px; border-radius: 4px; margin-top: 4px; overflow: hidden; }
    .fill { height: 100%; border-radius: 4px; }
    .total { display: flex; justify-content: space-between; font-weight: 700; margin-top: 16px; padding-top: 12px; }
    .empty { font-style: italic; }
    .progress { height: 6px; border-radius: 3px; overflow: hidden; position: relative; }
    .progress::after { content: ''; position: absolute; left: -40%; width: 40%; height: 100%; animation: slide 1.2s infinite ease-in-out; }
    @keyframes slide { from { left: -40%; } to { left: 100%; } }
    .placeholder { padding: 48px 16px; text-align: center; border-radius: 6px; }
";

const LIGHT_CSS: &str = "
    body { background: #f9fafb; color: #1f2937; }
    .card, .summary { background: #ffffff; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
    .badge { background: #f3f4f6; color: #4b5563; }
    .badge.accent { background: #e0e7ff; color: #4338ca; }
    .bar, .progress, .placeholder { background: #e5e7eb; }
    .fill, .progress::after { background: #4f46e5; }
    .total { border-top: 1px solid #e5e7eb; }
    .empty { color: #6b7280; }
";

const DARK_CSS: &str = "
    body { background: #1e1e1e; color: #e5e7eb; }
    .card, .summary { background: #2a2a2e; box-shadow: 0 1px 3px rgba(0,0,0,0.6); }
    .badge { background: #3a3a40; color: #d1d5db; }
    .badge.accent { background: #312e81; color: #c7d2fe; }
    .bar, .progress, .placeholder { background: #3f3f46; }
    .fill, .progress::after { background: #818cf8; }
    .total { border-top: 1px solid #3f3f46; }
    .empty { color: #9ca3af; }
";

impl Theme {
    fn stylesheet(self) -> String {
        let palette = match self {
            Theme::Light => LIGHT_CSS,
            Theme::Dark => DARK_CSS,
        };
        format!("{}{}", BASE_CSS, palette)
    }
}

fn bar_percent(scale: f64) -> f64 {
    scale.clamp(0.0, 1.0) * 100.0
}

fn render_summary(summary: &SummaryView) -> String {
    if !summary.has_detections() {
        return format!(
            "{}",
            html! {
                p(class="empty") : "No objects detected.";
            }
        );
    }

    let total = summary.total.to_string();
    format!(
        "{}",
        html! {
            @ for row in &summary.rows {
                div(class="row") {
                    div(class="head") {
                        span(class="label") : row.label.as_str();
                        span(class="count") : row.count.to_string();
                    }
                    div(class="bar") {
                        div(class="fill", style=format!("width: {:.1}%", bar_percent(row.scale))) {}
                    }
                }
            }
            div(class="total") {
                span : "Total Objects";
                span : total.as_str();
            }
        }
    )
}

fn render_annotated(model: &RenderModel) -> String {
    match (&model.result, model.show_progress) {
        (Some(result), _) => format!(
            "{}",
            html! {
                img(src=result.annotated_src.as_str(), alt="Annotated");
            }
        ),
        (None, true) => format!(
            "{}",
            html! {
                div(class="placeholder") {
                    p : "Analyzing blueprint…";
                    div(class="progress") {}
                }
            }
        ),
        (None, false) => format!(
            "{}",
            html! {
                div(class="placeholder") {
                    p : "Run the analysis to see detected objects.";
                }
            }
        ),
    }
}

/// Document for the web view. `Upload` is drawn by native widgets, so the
/// page is emptied and no image data outlives the released preview.
pub fn render_page(model: &RenderModel, theme: Theme) -> String {
    match model.mode {
        DisplayMode::Upload => String::new(),
        _ => render_html(model, theme),
    }
}

/// Renders the results page for every mode except `Upload`.
pub fn render_html(model: &RenderModel, theme: Theme) -> String {
    let heading = match model.mode {
        DisplayMode::Upload | DisplayMode::Ready => "Ready to Analyze",
        DisplayMode::Analyzing => "Analyzing",
        DisplayMode::Results => "Analysis Results",
    };
    let preview_src = model.preview_src.clone().unwrap_or_default();
    let file_name = model.file_name.clone().unwrap_or_default();
    let annotated = render_annotated(model);
    let summary = model
        .result
        .as_ref()
        .map(|r| render_summary(&r.summary))
        .unwrap_or_default();
    let show_summary = model.result.is_some();

    format!(
        "{}",
        html! {
            : doctype::HTML;
            html {
                head {
                    meta(charset="utf-8");
                    meta(http-equiv="Content-Security-Policy",
                         content="default-src 'none'; img-src data:; style-src 'unsafe-inline';");
                    style {
                        : Raw(theme.stylesheet());
                    }
                }
                body {
                    h2 : heading;
                    div(class="grid") {
                        div(class="card") {
                            span(class="badge") : "Original Blueprint";
                            img(src=preview_src.as_str(), alt=file_name.as_str());
                        }
                        div(class="card") {
                            span(class="badge accent") : "AI Detection";
                            : Raw(annotated.as_str());
                        }
                    }
                    @ if show_summary {
                        div(class="summary card") {
                            h2 : "Detected Objects";
                            : Raw(summary.as_str());
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobRegistry;
    use crate::state::tests::png_candidate;
    use crate::state::ErrorKind;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn summary(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs
            .iter()
            .map(|(label, count)| (label.to_string(), *count))
            .collect()
    }

    fn row<'a>(view: &'a SummaryView, label: &str) -> &'a SummaryRow {
        view.rows.iter().find(|r| r.label == label).unwrap()
    }

    fn analysis(pairs: &[(&str, u64)]) -> AnalysisResult {
        AnalysisResult {
            annotated_image: Arc::from(&b"\xff\xd8\xff\xe0"[..]),
            summary: summary(pairs),
        }
    }

    #[test]
    fn test_summary_total_and_scale() {
        let view = SummaryView::from_summary(&summary(&[("a", 3), ("b", 5), ("c", 0)]));
        assert_eq!(view.total, 8);
        assert_eq!(row(&view, "b").scale, 1.0);
        assert!((row(&view, "a").scale - 0.6).abs() < 1e-9);
        assert_eq!(row(&view, "c").scale, 0.0);
    }

    #[test]
    fn test_summary_ordering() {
        let view = SummaryView::from_summary(&summary(&[("door", 2), ("window", 4), ("bed", 2)]));
        let labels: Vec<&str> = view.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["window", "bed", "door"]);
    }

    #[test]
    fn test_empty_summary() {
        let view = SummaryView::from_summary(&BTreeMap::new());
        assert_eq!(view.total, 0);
        assert!(!view.has_detections());
    }

    #[test]
    fn test_all_zero_summary_has_no_nan() {
        let view = SummaryView::from_summary(&summary(&[("a", 0), ("b", 0)]));
        assert_eq!(view.total, 0);
        assert!(view.rows.iter().all(|r| r.scale == 0.0));
        assert!(view.has_detections());
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!(" DARK ".parse::<Theme>(), Ok(Theme::Dark));
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_present_upload_mode() {
        let state = WorkflowState::new(BlobRegistry::new());
        let model = present(&state);
        assert_eq!(model.mode, DisplayMode::Upload);
        assert!(!model.can_analyze);
        assert!(!model.can_reset);
        assert!(model.preview_src.is_none());
    }

    #[test]
    fn test_present_rejected_file_shows_error_without_preview() {
        let mut state = WorkflowState::new(BlobRegistry::new());
        state.submit_candidate(Some(crate::acquisition::Candidate {
            name: "notes.txt".to_string(),
            media_type: "text/plain".to_string(),
            bytes: b"hello".to_vec(),
        }));
        let model = present(&state);
        assert_eq!(model.mode, DisplayMode::Upload);
        assert!(model.preview_src.is_none());
        assert_eq!(model.error.unwrap().kind, ErrorKind::Validation);
    }

    #[test]
    fn test_present_ready_mode() {
        let mut state = WorkflowState::new(BlobRegistry::new());
        state.submit_candidate(Some(png_candidate("plan.png")));
        let model = present(&state);
        assert_eq!(model.mode, DisplayMode::Ready);
        assert!(model.can_analyze);
        assert!(!model.show_progress);
        assert_eq!(model.file_name.as_deref(), Some("plan.png"));
        assert!(model
            .preview_src
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_present_analyzing_mode_suppresses_run() {
        let mut state = WorkflowState::new(BlobRegistry::new());
        state.submit_candidate(Some(png_candidate("plan.png")));
        state.begin_analysis().unwrap();
        let model = present(&state);
        assert_eq!(model.mode, DisplayMode::Analyzing);
        assert!(!model.can_analyze);
        assert!(model.show_progress);
        assert!(model.preview_src.is_some());
    }

    #[test]
    fn test_present_results_mode() {
        let mut state = WorkflowState::new(BlobRegistry::new());
        state.submit_candidate(Some(png_candidate("plan.png")));
        let request = state.begin_analysis().unwrap();
        state.complete_analysis(request.generation, Ok(analysis(&[("window", 4), ("door", 2)])));

        let model = present(&state);
        assert_eq!(model.mode, DisplayMode::Results);
        assert!(!model.can_analyze);
        let result = model.result.unwrap();
        assert_eq!(result.annotated_src, "data:image/jpeg;base64,/9j/4A==");
        assert_eq!(result.summary.total, 6);
        assert_eq!(row(&result.summary, "window").scale, 1.0);
        assert_eq!(row(&result.summary, "door").scale, 0.5);
    }

    #[test]
    fn test_render_html_results() {
        let mut state = WorkflowState::new(BlobRegistry::new());
        state.submit_candidate(Some(png_candidate("plan.png")));
        let request = state.begin_analysis().unwrap();
        state.complete_analysis(request.generation, Ok(analysis(&[("window", 4), ("door", 2)])));

        let html = render_html(&present(&state), Theme::Light);
        assert!(html.contains("Analysis Results"));
        assert!(html.contains("src=\"data:image/jpeg;base64,/9j/4A==\""));
        assert!(html.contains("width: 100.0%"));
        assert!(html.contains("width: 50.0%"));
        assert!(html.contains(">window<"));
        assert!(html.contains(">6<"));
        assert!(!html.contains("No objects detected."));
        assert!(html.contains("#4f46e5"));
    }

    #[test]
    fn test_render_html_no_detections() {
        let mut state = WorkflowState::new(BlobRegistry::new());
        state.submit_candidate(Some(png_candidate("plan.png")));
        let request = state.begin_analysis().unwrap();
        state.complete_analysis(request.generation, Ok(analysis(&[])));

        let html = render_html(&present(&state), Theme::Dark);
        assert!(html.contains("No objects detected."));
        assert!(!html.contains("Total Objects"));
        assert!(html.contains("#818cf8"));
    }

    #[test]
    fn test_render_html_analyzing_shows_progress() {
        let mut state = WorkflowState::new(BlobRegistry::new());
        state.submit_candidate(Some(png_candidate("plan.png")));
        state.begin_analysis().unwrap();

        let html = render_html(&present(&state), Theme::Light);
        assert!(html.contains("class=\"progress\""));
        assert!(!html.contains("Detected Objects"));
    }

    #[test]
    fn test_render_html_escapes_labels() {
        let mut state = WorkflowState::new(BlobRegistry::new());
        state.submit_candidate(Some(png_candidate("plan.png")));
        let request = state.begin_analysis().unwrap();
        state.complete_analysis(request.generation, Ok(analysis(&[("<script>", 1)])));

        let html = render_html(&present(&state), Theme::Light);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_page_is_blank_after_reset() {
        let mut state = WorkflowState::new(BlobRegistry::new());
        state.submit_candidate(Some(png_candidate("plan.png")));
        let request = state.begin_analysis().unwrap();
        state.complete_analysis(request.generation, Ok(analysis(&[("door", 2)])));
        assert!(render_page(&present(&state), Theme::Light).contains("data:image/"));

        state.reset();
        assert_eq!(render_page(&present(&state), Theme::Light), "");
    }
}
