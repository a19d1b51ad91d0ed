use std::rc::Rc;

use gpui::*;
use gpui_component::{ActiveTheme, label::Label, v_flex, v_virtual_list};
use skillbench_workbench::{Message, Role, SessionId};

use crate::chat::scroll_manager::ScrollManager;

const DEFAULT_CONTENT_WIDTH: Pixels = px(680.);
const USER_BUBBLE_MAX_WIDTH: Pixels = px(540.);
const BUBBLE_PADDING_X: Pixels = px(14.);
const BUBBLE_PADDING_Y: Pixels = px(10.);
const SPEAKER_LABEL_HEIGHT: Pixels = px(16.);
const SPEAKER_LABEL_GAP: Pixels = px(8.);
const ROW_GAP: Pixels = px(16.);
const TEXT_LINE_HEIGHT: Pixels = px(18.);
const CHAR_WIDTH: f32 = 7.0;

/// Virtualized transcript of the active session.
pub struct MessageList {
    session_id: Option<SessionId>,
    messages: Vec<Message>,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    scroll_manager: ScrollManager,
}

impl MessageList {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self {
            session_id: None,
            messages: Vec::new(),
            item_sizes: Rc::new(Vec::new()),
            scroll_manager: ScrollManager::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn set_transcript(
        &mut self,
        session_id: SessionId,
        messages: &[Message],
        cx: &mut Context<Self>,
    ) {
        let session_changed = self.session_id != Some(session_id);
        self.session_id = Some(session_id);
        self.messages = messages.to_vec();
        self.item_sizes = Rc::new(
            self.messages
                .iter()
                .map(|message| size(px(0.), estimate_row_height(message, DEFAULT_CONTENT_WIDTH)))
                .collect(),
        );
        self.scroll_manager
            .observe_transcript(self.messages.len(), session_changed);
        cx.notify();
    }

    fn render_row(message: &Message, cx: &App) -> AnyElement {
        let theme = cx.theme();

        match message.role {
            Role::User => v_flex()
                .w_full()
                .items_end()
                .child(
                    div()
                        .max_w(USER_BUBBLE_MAX_WIDTH)
                        .px(BUBBLE_PADDING_X)
                        .py(BUBBLE_PADDING_Y)
                        .rounded_lg()
                        .bg(theme.accent)
                        .text_color(theme.accent_foreground)
                        .child(Label::new(message.content.clone()).text_sm()),
                )
                .into_any_element(),
            Role::Assistant => v_flex()
                .w_full()
                .gap_2()
                .child(
                    Label::new("Assistant")
                        .text_xs()
                        .text_color(theme.foreground.opacity(0.5)),
                )
                .child(Label::new(message.content.clone()).text_sm())
                .into_any_element(),
        }
    }

    fn render_empty_state(&self, cx: &App) -> AnyElement {
        let theme = cx.theme();

        v_flex()
            .size_full()
            .items_center()
            .justify_center()
            .gap_1()
            .child(
                Label::new("Start a conversation")
                    .text_sm()
                    .text_color(theme.foreground),
            )
            .child(
                Label::new("Pick a skill pack above or type a message below.")
                    .text_xs()
                    .text_color(theme.muted_foreground),
            )
            .into_any_element()
    }
}

impl Render for MessageList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if self.messages.is_empty() {
            return self.render_empty_state(cx);
        }

        self.scroll_manager.before_paint();

        v_flex()
            .size_full()
            .min_h_0()
            .child(
                v_virtual_list(
                    cx.entity().clone(),
                    "message-list",
                    self.item_sizes.clone(),
                    |this, visible_range, _window, cx| {
                        visible_range
                            .filter_map(|index| {
                                this.messages
                                    .get(index)
                                    .map(|message| Self::render_row(message, cx))
                            })
                            .collect::<Vec<_>>()
                    },
                )
                .size_full()
                .px_4()
                .py_3()
                .track_scroll(self.scroll_manager.handle()),
            )
            .into_any_element()
    }
}

fn estimate_row_height(message: &Message, content_width: Pixels) -> Pixels {
    let body = match message.role {
        Role::User => {
            let bubble_width = if content_width < USER_BUBBLE_MAX_WIDTH {
                content_width
            } else {
                USER_BUBBLE_MAX_WIDTH
            };
            estimate_text_height(&message.content, bubble_width - BUBBLE_PADDING_X * 2)
                + BUBBLE_PADDING_Y * 2
        }
        Role::Assistant => {
            SPEAKER_LABEL_HEIGHT
                + SPEAKER_LABEL_GAP
                + estimate_text_height(&message.content, content_width)
        }
    };

    body + ROW_GAP
}

fn estimate_text_height(content: &str, width: Pixels) -> Pixels {
    let chars_per_line = (f32::from(width) / CHAR_WIDTH).floor().max(1.0) as usize;
    let line_count = content
        .lines()
        .map(|line| line.chars().count().max(1).div_ceil(chars_per_line))
        .sum::<usize>()
        .max(1);

    TEXT_LINE_HEIGHT * line_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillbench_workbench::ASSISTANT_ACK_TEXT;

    #[test]
    fn long_transcript_rows_have_positive_deterministic_heights() {
        let messages = (0..2_000)
            .map(|index| {
                if index % 2 == 0 {
                    Message::user(format!("question {index}: please draft a landing page"))
                } else {
                    Message::assistant(ASSISTANT_ACK_TEXT)
                }
            })
            .collect::<Vec<_>>();

        let first_pass = messages
            .iter()
            .map(|message| estimate_row_height(message, DEFAULT_CONTENT_WIDTH))
            .collect::<Vec<_>>();
        let second_pass = messages
            .iter()
            .map(|message| estimate_row_height(message, DEFAULT_CONTENT_WIDTH))
            .collect::<Vec<_>>();

        assert_eq!(first_pass, second_pass);
        assert!(first_pass.iter().all(|height| *height > ROW_GAP));
    }

    #[test]
    fn wrapped_text_grows_row_height() {
        let short = Message::user("hi");
        let long = Message::user("word ".repeat(200));

        assert!(
            estimate_row_height(&long, DEFAULT_CONTENT_WIDTH)
                > estimate_row_height(&short, DEFAULT_CONTENT_WIDTH)
        );
    }
}
