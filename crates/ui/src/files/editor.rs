use std::time::Duration;

use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    v_flex,
};
use skillbench_workbench::files::SAVED_BANNER_MILLIS;
use skillbench_workbench::{FileEditor, OpenedFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEditorClosed;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSaveRequested {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownloadRequested {
    pub name: String,
}

impl EventEmitter<FileEditorClosed> for FileEditorView {}
impl EventEmitter<FileSaveRequested> for FileEditorView {}
impl EventEmitter<FileDownloadRequested> for FileEditorView {}

/// Read-only preview that switches to an editable buffer on demand.
pub struct FileEditorView {
    editor: FileEditor,
    buffer_input: Entity<InputState>,
    banner_task: Option<Task<()>>,
}

impl FileEditorView {
    pub fn new(file: OpenedFile, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let editor = FileEditor::open(file);
        let buffer_input = cx.new(|cx| {
            let mut state = InputState::new(window, cx).auto_grow(12, 40);
            state.set_value(editor.buffer().to_string(), window, cx);
            state
        });

        cx.subscribe(&buffer_input, |this, input, event: &InputEvent, cx| {
            if let InputEvent::Change { .. } = event {
                let text = input.read(cx).value().to_string();
                this.editor.set_buffer(text);
            }
        })
        .detach();

        Self {
            editor,
            buffer_input,
            banner_task: None,
        }
    }

    fn start_editing(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.editor.start_editing();
        self.buffer_input
            .update(cx, |state, cx| state.focus(window, cx));
        cx.notify();
    }

    fn save(&mut self, cx: &mut Context<Self>) {
        let content = self.editor.save();
        cx.emit(FileSaveRequested {
            name: self.editor.name().to_string(),
            content,
        });

        self.banner_task = Some(cx.spawn(async move |this, cx| {
            cx.background_executor()
                .timer(Duration::from_millis(SAVED_BANNER_MILLIS))
                .await;
            let _ = this.update(cx, |this, cx| {
                this.editor.dismiss_saved_banner();
                this.banner_task = None;
                cx.notify();
            });
        }));
        cx.notify();
    }

    fn render_toolbar(&self, cx: &mut Context<Self>) -> AnyElement {
        let theme = cx.theme();
        let editing = self.editor.is_editing();

        h_flex()
            .id("file-editor-toolbar")
            .w_full()
            .gap_2()
            .px_3()
            .py_2()
            .items_center()
            .border_b_1()
            .border_color(theme.border)
            .child(
                div()
                    .flex_1()
                    .min_w_0()
                    .truncate()
                    .text_sm()
                    .font_weight(FontWeight::MEDIUM)
                    .text_color(theme.foreground)
                    .child(self.editor.name().to_string()),
            )
            .when(self.editor.shows_saved_banner(), |bar| {
                bar.child(div().text_xs().text_color(theme.success).child("Saved"))
            })
            .when(!editing, |bar| {
                bar.child(
                    Button::new("file-editor-edit")
                        .ghost()
                        .xsmall()
                        .child("Edit")
                        .on_click(cx.listener(|this, _, window, cx| {
                            this.start_editing(window, cx);
                        })),
                )
            })
            .when(editing, |bar| {
                bar.child(
                    Button::new("file-editor-save")
                        .primary()
                        .xsmall()
                        .child("Save")
                        .on_click(cx.listener(|this, _, _window, cx| this.save(cx))),
                )
            })
            .child(
                Button::new("file-editor-download")
                    .ghost()
                    .xsmall()
                    .child("Download")
                    .on_click(cx.listener(|this, _, _window, cx| {
                        cx.emit(FileDownloadRequested {
                            name: this.editor.name().to_string(),
                        });
                    })),
            )
            .child(
                Button::new("file-editor-close")
                    .ghost()
                    .xsmall()
                    .icon(IconName::Close)
                    .on_click(cx.listener(|_, _, _window, cx| cx.emit(FileEditorClosed))),
            )
            .into_any_element()
    }
}

impl Render for FileEditorView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let toolbar = self.render_toolbar(cx);
        let theme = cx.theme();
        let body = if self.editor.is_editing() {
            Input::new(&self.buffer_input).w_full().into_any_element()
        } else {
            div()
                .w_full()
                .p_3()
                .font_family("monospace")
                .text_sm()
                .text_color(theme.foreground)
                .whitespace_normal()
                .child(self.editor.buffer().to_string())
                .into_any_element()
        };

        v_flex()
            .id("file-editor")
            .size_full()
            .min_h_0()
            .child(toolbar)
            .child(
                div()
                    .id("file-editor-body")
                    .flex_1()
                    .min_h_0()
                    .overflow_y_scroll()
                    .p_2()
                    .child(body),
            )
    }
}
