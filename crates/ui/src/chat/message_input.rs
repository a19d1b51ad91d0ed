use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    v_flex,
};

use crate::chat::events::{AttachImageClicked, DraftEdited, Submit};

/// Composer: text field, skill badge, attach and send buttons.
///
/// The draft itself lives in the workbench; this view mirrors it and reports edits.
pub struct MessageInput {
    input_state: Entity<InputState>,
    badge: Option<SharedString>,
    can_send: bool,
    pending_newline: bool,
}

impl EventEmitter<Submit> for MessageInput {}
impl EventEmitter<DraftEdited> for MessageInput {}
impl EventEmitter<AttachImageClicked> for MessageInput {}

impl MessageInput {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("Ask anything, or pick a skill to start from a template...")
                .auto_grow(3, 10)
        });

        cx.subscribe_in(
            &input_state,
            window,
            |this, _, event: &InputEvent, window, cx| match event {
                InputEvent::PressEnter { secondary } => {
                    if *secondary {
                        this.pending_newline = false;
                        return;
                    }

                    if this.pending_newline {
                        // Shift+Enter already inserted the newline; swallow the trailing PressEnter.
                        this.pending_newline = false;
                    } else {
                        this.trim_trailing_newline(window, cx);
                        this.submit(cx);
                    }
                }
                InputEvent::Change { .. } => {
                    let text = this.input_state.read(cx).value().to_string();
                    cx.emit(DraftEdited { text });
                }
                _ => {}
            },
        )
        .detach();

        Self {
            input_state,
            badge: None,
            can_send: false,
            pending_newline: false,
        }
    }

    /// Replaces the visible text, e.g. after a skill prefilled the draft.
    pub fn set_text(&mut self, text: &str, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value(text.to_string(), window, cx);
        });
        self.pending_newline = false;
        cx.notify();
    }

    pub fn set_badge(&mut self, badge: Option<String>, cx: &mut Context<Self>) {
        self.badge = badge.map(SharedString::from);
        cx.notify();
    }

    pub fn set_can_send(&mut self, can_send: bool, cx: &mut Context<Self>) {
        self.can_send = can_send;
        cx.notify();
    }

    pub fn focus(&self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| state.focus(window, cx));
    }

    fn handle_shift_enter(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.pending_newline = true;
        self.input_state.update(cx, |state, cx| {
            state.insert("\n", window, cx);
        });
        cx.notify();
    }

    fn trim_trailing_newline(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            let value = state.value().to_string();
            if let Some(trimmed) = value.strip_suffix('\n') {
                state.set_value(trimmed.to_string(), window, cx);
            }
        });
    }

    fn submit(&mut self, cx: &mut Context<Self>) {
        let content = self.input_state.read(cx).value().to_string();
        if content.trim().is_empty() {
            return;
        }

        cx.emit(Submit::new(content));
    }
}

impl Render for MessageInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .bg(theme.background)
            .gap_2()
            .p_3()
            .when_some(self.badge.clone(), |column, badge| {
                column.child(
                    h_flex().child(
                        div()
                            .id("composer-badge")
                            .px_2()
                            .py_1()
                            .rounded_full()
                            .bg(theme.muted)
                            .border_1()
                            .border_color(theme.border)
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child(badge),
                    ),
                )
            })
            .child(
                div()
                    .w_full()
                    .px_3()
                    .py_2()
                    .rounded_lg()
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.background)
                    .on_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                        if event.keystroke.key == "enter" && event.keystroke.modifiers.shift {
                            this.handle_shift_enter(window, cx);
                        }
                    }))
                    .child(Input::new(&self.input_state).w_full()),
            )
            .child(
                h_flex()
                    .w_full()
                    .justify_between()
                    .child(
                        Button::new("attach-image")
                            .ghost()
                            .small()
                            .icon(IconName::Plus)
                            .child("Image")
                            .on_click(cx.listener(|_, _, _window, cx| {
                                cx.emit(AttachImageClicked);
                            })),
                    )
                    .child(
                        Button::new("send")
                            .small()
                            .primary()
                            .icon(IconName::ArrowUp)
                            .child("Send")
                            .disabled(!self.can_send)
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.submit(cx);
                            })),
                    ),
            )
    }
}
