#![deny(unsafe_code)]

/// Window shell: login gate, toolbars and panel layout.
pub mod app;
/// Mock sign-in entity and login form.
pub mod auth;
/// History sidebar, skill picker, transcript and composer.
pub mod chat;
/// Workspace file list and editor.
pub mod files;
pub mod model_selector;
/// Settings entity and settings overlay.
pub mod settings;
