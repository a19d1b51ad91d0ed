use std::rc::Rc;

use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable, VirtualListScrollHandle,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    list::ListItem,
    v_flex, v_virtual_list,
};
use skillbench_workbench::session::unix_now_millis;
use skillbench_workbench::{Session, SessionId};

use crate::chat::events::{NewSessionClicked, SessionSelected};

const GROUP_HEADER_HEIGHT: f32 = 26.0;
const SESSION_ROW_HEIGHT: f32 = 52.0;
const DAY_MILLIS: u64 = 24 * 60 * 60 * 1000;

/// Snapshot of one session as the history list shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub id: SessionId,
    pub title: String,
    pub message_count: usize,
    pub created_at_unix_millis: u64,
}

impl SessionRow {
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: session.id,
            title: session.title().to_string(),
            message_count: session.messages().len(),
            created_at_unix_millis: session.created_at_unix_millis(),
        }
    }

    pub fn message_count_label(&self) -> String {
        match self.message_count {
            1 => "1 message".to_string(),
            count => format!("{count} messages"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionAgeGroup {
    Today,
    Yesterday,
    Older,
}

#[derive(Debug, Clone)]
enum SidebarListItem {
    GroupHeader(&'static str),
    Session(SessionRow),
}

/// Session history, newest first, grouped by age.
pub struct ChatSidebar {
    search_input: Entity<InputState>,
    search_query: String,
    rows: Vec<SessionRow>,
    active_session: Option<SessionId>,
    flat_items: Vec<SidebarListItem>,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    scroll_handle: VirtualListScrollHandle,
}

impl EventEmitter<SessionSelected> for ChatSidebar {}
impl EventEmitter<NewSessionClicked> for ChatSidebar {}

impl ChatSidebar {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let search_input =
            cx.new(|cx| InputState::new(window, cx).placeholder("Search sessions..."));

        cx.subscribe_in(
            &search_input,
            window,
            |this, _, _event: &InputEvent, _window, cx| {
                this.search_query = this.search_input.read(cx).value().to_string();
                this.rebuild_flat_items(unix_now_millis());
                cx.notify();
            },
        )
        .detach();

        Self {
            search_input,
            search_query: String::new(),
            rows: Vec::new(),
            active_session: None,
            flat_items: Vec::new(),
            item_sizes: Rc::new(Vec::new()),
            scroll_handle: VirtualListScrollHandle::new(),
        }
    }

    /// Rows must already be in display order.
    pub fn set_sessions(
        &mut self,
        rows: Vec<SessionRow>,
        active_session: SessionId,
        cx: &mut Context<Self>,
    ) {
        self.rows = rows;
        self.active_session = Some(active_session);
        self.rebuild_flat_items(unix_now_millis());
        cx.notify();
    }

    fn rebuild_flat_items(&mut self, now_unix_millis: u64) {
        let (flat_items, item_sizes) =
            build_flat_items(&self.rows, &self.search_query, now_unix_millis);
        self.flat_items = flat_items;
        self.item_sizes = Rc::new(item_sizes);
    }

    fn render_toolbar(&mut self, cx: &mut Context<Self>) -> AnyElement {
        h_flex()
            .w_full()
            .min_w_0()
            .gap_2()
            .px_3()
            .pt(px(8.))
            .pb_2()
            .child(Input::new(&self.search_input).w_full().small())
            .child(
                Button::new("new-session")
                    .small()
                    .primary()
                    .icon(IconName::Plus)
                    .child("New")
                    .on_click(cx.listener(|_, _, _window, cx| {
                        cx.emit(NewSessionClicked);
                    })),
            )
            .into_any_element()
    }

    fn render_empty_state(&mut self, cx: &mut Context<Self>) -> AnyElement {
        let theme = cx.theme();

        v_flex()
            .flex_1()
            .items_center()
            .justify_center()
            .px_4()
            .child(
                Label::new("No sessions match your search")
                    .text_sm()
                    .text_color(theme.foreground.opacity(0.55)),
            )
            .into_any_element()
    }

    fn render_history_list(&mut self, cx: &mut Context<Self>) -> AnyElement {
        if self.flat_items.is_empty() {
            return self.render_empty_state(cx);
        }

        let active = self.active_session;
        let item_sizes = self.item_sizes.clone();
        let items = self.flat_items.clone();

        v_flex()
            .flex_1()
            .min_h_0()
            .child(
                v_virtual_list(
                    cx.entity().clone(),
                    "session-list",
                    item_sizes,
                    move |_this, visible_range, _window, cx| {
                        let theme = cx.theme();

                        visible_range
                            .map(|index| match &items[index] {
                                SidebarListItem::GroupHeader(name) => div()
                                    .w_full()
                                    .h(px(GROUP_HEADER_HEIGHT))
                                    .px_3()
                                    .flex()
                                    .items_center()
                                    .child(
                                        Label::new(*name)
                                            .text_xs()
                                            .text_color(theme.foreground.opacity(0.5)),
                                    )
                                    .into_any_element(),
                                SidebarListItem::Session(row) => {
                                    let session_id = row.id;

                                    div()
                                        .w_full()
                                        .h(px(SESSION_ROW_HEIGHT))
                                        .px_2()
                                        .child(
                                            ListItem::new(("session", index))
                                                .w_full()
                                                .h_full()
                                                .px_3()
                                                .py_2()
                                                .rounded_md()
                                                .selected(active == Some(session_id))
                                                .on_click(cx.listener(
                                                    move |_this, _event: &ClickEvent, _window, cx| {
                                                        cx.emit(SessionSelected { session_id });
                                                    },
                                                ))
                                                .child(
                                                    v_flex()
                                                        .w_full()
                                                        .min_w_0()
                                                        .child(
                                                            div().truncate().child(
                                                                Label::new(row.title.clone())
                                                                    .text_sm(),
                                                            ),
                                                        )
                                                        .child(
                                                            Label::new(row.message_count_label())
                                                                .text_xs()
                                                                .text_color(
                                                                    theme.muted_foreground,
                                                                ),
                                                        ),
                                                ),
                                        )
                                        .into_any_element()
                                }
                            })
                            .collect()
                    },
                )
                .w_full()
                .flex_1()
                .track_scroll(&self.scroll_handle),
            )
            .into_any_element()
    }
}

impl Render for ChatSidebar {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .size_full()
            .min_w_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(self.render_toolbar(cx))
            .child(self.render_history_list(cx))
    }
}

fn build_flat_items(
    rows: &[SessionRow],
    query: &str,
    now_unix_millis: u64,
) -> (Vec<SidebarListItem>, Vec<Size<Pixels>>) {
    let normalized_query = query.trim().to_lowercase();

    let mut today = Vec::new();
    let mut yesterday = Vec::new();
    let mut older = Vec::new();

    // Incoming order is preserved inside each group.
    for row in rows {
        if !normalized_query.is_empty() && !row.title.to_lowercase().contains(&normalized_query) {
            continue;
        }

        match classify_group(row.created_at_unix_millis, now_unix_millis) {
            SessionAgeGroup::Today => today.push(row.clone()),
            SessionAgeGroup::Yesterday => yesterday.push(row.clone()),
            SessionAgeGroup::Older => older.push(row.clone()),
        }
    }

    let mut flat_items = Vec::new();
    let mut item_sizes = Vec::new();
    for (title, group) in [("Today", today), ("Yesterday", yesterday), ("Older", older)] {
        if group.is_empty() {
            continue;
        }

        flat_items.push(SidebarListItem::GroupHeader(title));
        item_sizes.push(size(px(0.), px(GROUP_HEADER_HEIGHT)));
        for row in group {
            flat_items.push(SidebarListItem::Session(row));
            item_sizes.push(size(px(0.), px(SESSION_ROW_HEIGHT)));
        }
    }

    (flat_items, item_sizes)
}

fn classify_group(created_at_unix_millis: u64, now_unix_millis: u64) -> SessionAgeGroup {
    // Elapsed-time buckets, no timezone lookup.
    let age = now_unix_millis.saturating_sub(created_at_unix_millis);
    if age < DAY_MILLIS {
        SessionAgeGroup::Today
    } else if age < DAY_MILLIS * 2 {
        SessionAgeGroup::Yesterday
    } else {
        SessionAgeGroup::Older
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 10 * DAY_MILLIS;

    fn row(title: &str, created_at_unix_millis: u64) -> SessionRow {
        SessionRow {
            id: SessionId::new_v7(),
            title: title.to_string(),
            message_count: 0,
            created_at_unix_millis,
        }
    }

    fn labels(items: &[SidebarListItem]) -> Vec<String> {
        items
            .iter()
            .map(|item| match item {
                SidebarListItem::GroupHeader(name) => format!("# {name}"),
                SidebarListItem::Session(row) => row.title.clone(),
            })
            .collect()
    }

    #[test]
    fn rows_are_bucketed_by_age_in_incoming_order() {
        let rows = vec![
            row("fresh", NOW - 1_000),
            row("morning", NOW - 2_000),
            row("last night", NOW - DAY_MILLIS - 1),
            row("ancient", NOW - 5 * DAY_MILLIS),
        ];

        let (items, sizes) = build_flat_items(&rows, "", NOW);

        assert_eq!(
            labels(&items),
            vec![
                "# Today",
                "fresh",
                "morning",
                "# Yesterday",
                "last night",
                "# Older",
                "ancient"
            ]
        );
        assert_eq!(items.len(), sizes.len());
    }

    #[test]
    fn search_filters_titles_case_insensitively() {
        let rows = vec![row("SEO plan", NOW), row("Ad copy", NOW)];

        let (items, _) = build_flat_items(&rows, "  seo ", NOW);
        assert_eq!(labels(&items), vec!["# Today", "SEO plan"]);

        let (items, _) = build_flat_items(&rows, "missing", NOW);
        assert!(items.is_empty());
    }

    #[test]
    fn message_count_label_pluralizes() {
        let mut session_row = row("t", NOW);
        assert_eq!(session_row.message_count_label(), "0 messages");
        session_row.message_count = 1;
        assert_eq!(session_row.message_count_label(), "1 message");
        session_row.message_count = 4;
        assert_eq!(session_row.message_count_label(), "4 messages");
    }
}
