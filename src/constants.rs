//! Application-wide constants for babyard-vision.
//!
//! Centralizes endpoint paths, environment variable names and the fixed
//! user-facing messages so the workflow and the UI agree on them.

use std::time::Duration;

// ============================================================================
// Application Identity
// ============================================================================

/// GTK Application ID following reverse-DNS convention.
pub const APP_ID: &str = "com.github.babyard-vision";

/// Application name displayed in window title.
pub const APP_NAME: &str = "Babyard-Vision Lite";

// ============================================================================
// Window Configuration
// ============================================================================

/// Default window width in pixels.
pub const DEFAULT_WINDOW_WIDTH: i32 = 1200;

/// Default window height in pixels.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 800;

// ============================================================================
// Analysis Service
// ============================================================================

/// Base URL used when no environment override is present.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Path of the analysis endpoint, appended to the base URL.
pub const ANALYZE_PATH: &str = "/analyze";

/// Name of the multipart field carrying the image.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Upper bound on a whole analysis exchange.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Media type assumed for the annotated image returned by the service.
pub const ANNOTATED_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

// ============================================================================
// Environment
// ============================================================================

/// Overrides the analysis service base URL.
pub const API_URL_ENV: &str = "BABYARD_API_URL";

/// Overrides the request timeout, in whole seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "BABYARD_REQUEST_TIMEOUT_SECS";

/// Pins the result page theme (`light` or `dark`).
pub const THEME_ENV: &str = "BABYARD_THEME";

// ============================================================================
// Input Acquisition
// ============================================================================

/// Declared media types must start with this prefix to be accepted.
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// URI scheme prefix for locally registered preview blobs.
pub const BLOB_URI_PREFIX: &str = "blob:babyard/";

// ============================================================================
// User-facing Messages
// ============================================================================

/// Shown when a candidate file is not an image.
pub const INVALID_IMAGE_MESSAGE: &str = "Please upload a valid image file.";

/// Shown when the analysis exchange fails for any reason.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to analyze image. Is the analysis service running and reachable?";
