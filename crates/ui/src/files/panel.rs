use std::path::PathBuf;
use std::time::Duration;

use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, Icon, IconName, Sizable, h_flex,
    input::{Input, InputEvent, InputState},
    v_flex,
};
use skillbench_workbench::files::DOWNLOAD_DELAY_MILLIS;
use skillbench_workbench::{EntryKind, FileBrowser, FileEntry};

use crate::files::download::{DownloadError, write_download};
use crate::files::editor::{
    FileDownloadRequested, FileEditorClosed, FileEditorView, FileSaveRequested,
};

/// Toast request raised by the panel; the shell owns the notification layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilesNotice {
    Success(String),
    Error(String),
}

impl EventEmitter<FilesNotice> for FilesPanel {}

pub struct FilesPanel {
    browser: FileBrowser,
    search_input: Entity<InputState>,
    query: String,
    editor: Option<Entity<FileEditorView>>,
}

impl FilesPanel {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let search_input =
            cx.new(|cx| InputState::new(window, cx).placeholder("Search files..."));

        cx.subscribe(&search_input, |this, input, event: &InputEvent, cx| {
            if let InputEvent::Change { .. } = event {
                this.query = input.read(cx).value().to_string();
                cx.notify();
            }
        })
        .detach();

        Self {
            browser: FileBrowser::sample(),
            search_input,
            query: String::new(),
            editor: None,
        }
    }

    fn open_file(&mut self, name: &str, window: &mut Window, cx: &mut Context<Self>) {
        let file = match self.browser.open(name) {
            Ok(file) => file,
            Err(error) => {
                tracing::warn!("cannot open {name}: {error}");
                cx.emit(FilesNotice::Error(error.to_string()));
                return;
            }
        };

        let editor = cx.new(|cx| FileEditorView::new(file, window, cx));

        cx.subscribe(&editor, |this, _, _: &FileEditorClosed, cx| {
            this.editor = None;
            cx.notify();
        })
        .detach();

        cx.subscribe(&editor, |this, _, event: &FileSaveRequested, cx| {
            this.save_file(event, cx);
        })
        .detach();

        cx.subscribe(&editor, |this, _, event: &FileDownloadRequested, cx| {
            this.download_file(&event.name, cx);
        })
        .detach();

        self.editor = Some(editor);
        cx.notify();
    }

    fn save_file(&mut self, event: &FileSaveRequested, cx: &mut Context<Self>) {
        if let Err(error) = self.browser.save(&event.name, event.content.clone()) {
            tracing::error!("failed to save {}: {error}", event.name);
            cx.emit(FilesNotice::Error(error.to_string()));
        }
    }

    fn download_file(&mut self, name: &str, cx: &mut Context<Self>) {
        let payload = match self.browser.download(name) {
            Ok(payload) => payload,
            Err(error) => {
                cx.emit(FilesNotice::Error(error.to_string()));
                return;
            }
        };

        // Each download runs to completion; a later click never cancels it.
        cx.spawn(async move |this, cx| {
            cx.background_executor()
                .timer(Duration::from_millis(DOWNLOAD_DELAY_MILLIS))
                .await;

            let written = cx
                .background_executor()
                .spawn(async move { write_download(&payload) })
                .await;

            let _ = this.update(cx, |_, cx| cx.emit(download_notice(written)));
        })
        .detach();
    }

    fn render_entry(&self, index: usize, entry: &FileEntry, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();
        let is_file = entry.kind == EntryKind::File;
        let name = entry.name.clone();
        let icon = match entry.kind {
            EntryKind::File => IconName::File,
            EntryKind::Folder => IconName::Folder,
        };

        h_flex()
            .id(("file-entry", index))
            .w_full()
            .px_3()
            .py_2()
            .gap_2()
            .items_center()
            .rounded_md()
            .when(is_file, |row| {
                row.cursor_pointer()
                    .hover(|row| row.bg(theme.muted.opacity(0.5)))
                    .on_click(cx.listener(move |this, _, window, cx| {
                        this.open_file(&name, window, cx);
                    }))
            })
            .child(
                Icon::new(icon)
                    .size(px(14.))
                    .text_color(theme.muted_foreground),
            )
            .child(
                div()
                    .flex_1()
                    .min_w_0()
                    .truncate()
                    .text_sm()
                    .text_color(theme.foreground)
                    .child(entry.name.clone()),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.muted_foreground)
                    .child(entry.modified_label.clone()),
            )
            .into_any_element()
    }
}

fn download_notice(written: Result<PathBuf, DownloadError>) -> FilesNotice {
    match written {
        Ok(path) => FilesNotice::Success(format!("Saved to {}", path.display())),
        Err(error) => {
            tracing::error!("download failed: {error}");
            FilesNotice::Error(error.to_string())
        }
    }
}

impl Render for FilesPanel {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if let Some(editor) = self.editor.clone() {
            return v_flex()
                .id("files-panel")
                .size_full()
                .child(editor)
                .into_any_element();
        }

        let theme = cx.theme();
        let entries = self
            .browser
            .filter(&self.query)
            .into_iter()
            .enumerate()
            .map(|(index, entry)| self.render_entry(index, entry, cx))
            .collect::<Vec<_>>();
        let is_empty = entries.is_empty();

        v_flex()
            .id("files-panel")
            .size_full()
            .gap_2()
            .p_3()
            .child(
                div()
                    .text_sm()
                    .font_weight(FontWeight::SEMIBOLD)
                    .text_color(theme.foreground)
                    .child("Files"),
            )
            .child(Input::new(&self.search_input).small().w_full())
            .child(
                v_flex()
                    .id("files-panel-entries")
                    .flex_1()
                    .min_h_0()
                    .overflow_y_scroll()
                    .children(entries)
                    .when(is_empty, |list| {
                        list.child(
                            div()
                                .p_3()
                                .text_sm()
                                .text_color(theme.muted_foreground)
                                .child("No files match your search."),
                        )
                    }),
            )
            .into_any_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_finished_download_yields_its_own_notice() {
        let first = PathBuf::from("/downloads/report.md");
        let second = PathBuf::from("/downloads/report (1).md");

        assert_eq!(
            download_notice(Ok(first.clone())),
            FilesNotice::Success(format!("Saved to {}", first.display()))
        );
        assert_eq!(
            download_notice(Ok(second.clone())),
            FilesNotice::Success(format!("Saved to {}", second.display()))
        );

        let failed = Err(DownloadError::WriteFile {
            stage: "write-download",
            source: std::io::Error::other("disk full"),
        });
        let notice = download_notice(failed);
        assert!(
            matches!(&notice, FilesNotice::Error(message) if message.contains("disk full")),
            "unexpected notice {notice:?}"
        );
    }
}
