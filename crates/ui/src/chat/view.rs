use std::path::Path;
use std::sync::Arc;

use gpui::*;
use gpui_component::{ActiveTheme, v_flex};
use skillbench_workbench::{DraftChange, SessionId, SkillCatalog, Workbench};

use crate::chat::events::{
    AttachImageClicked, DraftEdited, NewSessionClicked, PackClicked, SessionSelected, SkillClicked,
    Submit,
};
use crate::chat::sidebar::SessionRow;
use crate::chat::{ChatSidebar, MessageInput, MessageList, SkillPicker};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Owns the [`Workbench`] and forwards every child-view intent into it.
///
/// Child views only render snapshots; after each intent the affected views are re-synced.
pub struct ChatView {
    workbench: Workbench,
    sidebar: Entity<ChatSidebar>,
    skill_picker: Entity<SkillPicker>,
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
}

impl ChatView {
    pub fn new(catalog: Arc<SkillCatalog>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let sidebar = cx.new(|cx| ChatSidebar::new(window, cx));
        let skill_picker = cx.new(|_| SkillPicker::new(catalog.clone()));
        let message_list = cx.new(MessageList::new);
        let message_input = cx.new(|cx| MessageInput::new(window, cx));

        cx.subscribe_in(&sidebar, window, |this, _, event: &SessionSelected, window, cx| {
            this.select_session(event.session_id, window, cx);
        })
        .detach();

        cx.subscribe_in(&sidebar, window, |this, _, _: &NewSessionClicked, window, cx| {
            this.create_session(window, cx);
        })
        .detach();

        cx.subscribe_in(&skill_picker, window, |this, _, event: &PackClicked, _window, cx| {
            this.handle_pack_clicked(*event, cx);
        })
        .detach();

        cx.subscribe_in(&skill_picker, window, |this, _, event: &SkillClicked, window, cx| {
            this.handle_skill_clicked(&event.skill_id, window, cx);
        })
        .detach();

        cx.subscribe_in(&message_input, window, |this, _, event: &Submit, window, cx| {
            this.handle_submit(event, window, cx);
        })
        .detach();

        cx.subscribe(&message_input, |this, _, event: &DraftEdited, cx| {
            this.workbench.set_draft(event.text.clone());
            this.sync_composer(cx);
        })
        .detach();

        cx.subscribe(&message_input, |this, _, _: &AttachImageClicked, cx| {
            this.prompt_for_image(cx);
        })
        .detach();

        let this = Self {
            workbench: Workbench::new(catalog),
            sidebar,
            skill_picker,
            message_list,
            message_input,
        };
        this.sync_all(cx);
        this
    }

    pub fn sidebar(&self) -> &Entity<ChatSidebar> {
        &self.sidebar
    }

    pub fn create_session(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.workbench.create_session();
        self.sync_all(cx);
        self.sync_draft_text(window, cx);
        self.message_input
            .update(cx, |input, cx| input.focus(window, cx));
    }

    fn select_session(&mut self, session_id: SessionId, window: &mut Window, cx: &mut Context<Self>) {
        if session_id == self.workbench.active_id() {
            return;
        }

        if self.workbench.select_session(session_id) {
            self.sync_all(cx);
            self.sync_draft_text(window, cx);
        }
    }

    fn handle_pack_clicked(&mut self, event: PackClicked, cx: &mut Context<Self>) {
        let changed = match event {
            PackClicked::Single { pack_index } => self.workbench.click_pack(pack_index, 1),
            PackClicked::Double { pack_index } => self.workbench.click_pack(pack_index, 2),
        };

        if changed {
            self.sync_selection(cx);
        }
    }

    fn handle_skill_clicked(&mut self, skill_id: &str, window: &mut Window, cx: &mut Context<Self>) {
        match self.workbench.select_skill(skill_id) {
            DraftChange::Keep => return,
            DraftChange::Replace(_) | DraftChange::Clear => self.sync_draft_text(window, cx),
        }

        self.sync_selection(cx);
        self.message_input
            .update(cx, |input, cx| input.focus(window, cx));
    }

    fn handle_submit(&mut self, event: &Submit, window: &mut Window, cx: &mut Context<Self>) {
        self.workbench.set_draft(event.content.clone());
        if self.workbench.send_draft().is_none() {
            return;
        }

        self.sync_all(cx);
        self.sync_draft_text(window, cx);
    }

    fn prompt_for_image(&mut self, cx: &mut Context<Self>) {
        let paths = cx.prompt_for_paths(PathPromptOptions {
            files: true,
            directories: false,
            multiple: false,
            prompt: None,
        });

        cx.spawn(async move |this, cx| {
            let picked = match paths.await {
                Ok(Ok(Some(paths))) => paths.into_iter().next(),
                Ok(Ok(None)) => None,
                Ok(Err(error)) => {
                    tracing::warn!("image picker failed: {error}");
                    None
                }
                Err(_) => None,
            };

            let Some(file_name) = picked.as_deref().and_then(image_file_name) else {
                if let Some(path) = picked {
                    tracing::warn!("ignoring non-image attachment {:?}", path);
                }
                return;
            };

            let _ = this.update(cx, |this, cx| {
                if this.workbench.attach_image(&file_name).is_some() {
                    this.sync_all(cx);
                }
            });
        })
        .detach();
    }

    fn sync_all(&self, cx: &mut Context<Self>) {
        self.sync_sessions(cx);
        self.sync_selection(cx);
        self.sync_transcript(cx);
        self.sync_composer(cx);
    }

    fn sync_sessions(&self, cx: &mut Context<Self>) {
        let rows = self
            .workbench
            .store()
            .sessions_by_recency()
            .into_iter()
            .map(SessionRow::from_session)
            .collect::<Vec<_>>();
        let active_id = self.workbench.active_id();

        self.sidebar
            .update(cx, |sidebar, cx| sidebar.set_sessions(rows, active_id, cx));
    }

    fn sync_selection(&self, cx: &mut Context<Self>) {
        let session = self.workbench.active_session();
        self.skill_picker
            .update(cx, |picker, cx| picker.sync(session, cx));
        self.sync_composer(cx);
    }

    fn sync_transcript(&self, cx: &mut Context<Self>) {
        let session = self.workbench.active_session();
        self.message_list.update(cx, |list, cx| {
            list.set_transcript(session.id, session.messages(), cx)
        });
    }

    fn sync_composer(&self, cx: &mut Context<Self>) {
        let badge = self.workbench.composer_badge();
        let can_send = self.workbench.can_send();
        self.message_input.update(cx, |input, cx| {
            input.set_badge(badge, cx);
            input.set_can_send(can_send, cx);
        });
    }

    /// Pushes the workbench draft into the text field after a programmatic change.
    fn sync_draft_text(&self, window: &mut Window, cx: &mut Context<Self>) {
        let draft = self.workbench.draft().to_string();
        self.message_input
            .update(cx, |input, cx| input.set_text(&draft, window, cx));
        self.sync_composer(cx);
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("chat-view")
            .relative()
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(
                div()
                    .id("chat-view-skill-picker")
                    .flex_shrink_0()
                    .w_full()
                    .border_b_1()
                    .border_color(theme.border)
                    .child(self.skill_picker.clone()),
            )
            .child(
                div()
                    .id("chat-view-message-list")
                    .flex_1()
                    .min_h_0()
                    .child(self.message_list.clone()),
            )
            .child(
                div()
                    .id("chat-view-message-input")
                    .flex_shrink_0()
                    .w_full()
                    .border_t_1()
                    .border_color(theme.border)
                    .child(self.message_input.clone()),
            )
    }
}

/// File name of a picked path when it looks like an image.
fn image_file_name(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return None;
    }

    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_image_extensions_are_attached() {
        assert_eq!(
            image_file_name(Path::new("/tmp/Banner.PNG")).as_deref(),
            Some("Banner.PNG")
        );
        assert_eq!(
            image_file_name(Path::new("shots/hero.webp")).as_deref(),
            Some("hero.webp")
        );
        assert_eq!(image_file_name(Path::new("notes.txt")), None);
        assert_eq!(image_file_name(Path::new("no-extension")), None);
    }
}
