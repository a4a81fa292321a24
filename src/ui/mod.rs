//! UI module containing all user interface components and signal handlers.

pub mod actions;
pub mod drop_zone;
pub mod file_ops;
pub mod header;
pub mod view;
pub mod webview;
