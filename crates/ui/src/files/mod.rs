//! Workspace file browser shown beside the chat.

pub mod download;
pub mod editor;
pub mod panel;

pub use download::{DownloadError, download_destination, write_download};
pub use editor::{FileDownloadRequested, FileEditorClosed, FileEditorView, FileSaveRequested};
pub use panel::{FilesNotice, FilesPanel};
