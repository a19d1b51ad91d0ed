use std::sync::Arc;

use super::catalog::{Skill, SkillCatalog};
use super::composer::{self, Composer};
use super::ids::{MessageId, SessionId};
use super::selection::{self, DraftChange};
use super::session::{ASSISTANT_ACK_TEXT, Message, Session};
use super::store::SessionStore;

/// Result of an accepted send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOutcome {
    pub session_id: SessionId,
    pub user_message_id: MessageId,
    pub assistant_message_id: MessageId,
    pub title_changed: bool,
}

/// Page-level state container: sessions, the composer draft and the shared catalog.
///
/// Every user intent enters through one of these methods; the view layer only reads.
#[derive(Debug, Clone)]
pub struct Workbench {
    store: SessionStore,
    composer: Composer,
    catalog: Arc<SkillCatalog>,
}

impl Workbench {
    pub fn new(catalog: Arc<SkillCatalog>) -> Self {
        Self {
            store: SessionStore::new(),
            composer: Composer::new(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<SkillCatalog> {
        &self.catalog
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn active_session(&self) -> &Session {
        self.store.active()
    }

    pub fn active_id(&self) -> SessionId {
        self.store.active_id()
    }

    pub fn draft(&self) -> &str {
        self.composer.draft()
    }

    pub fn can_send(&self) -> bool {
        self.composer.can_send()
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.composer.set_draft(draft);
    }

    /// Creates a session, makes it active and clears the draft.
    pub fn create_session(&mut self) -> SessionId {
        let id = self.store.create_session();
        self.store.select_session(id);
        self.composer.clear();
        id
    }

    /// Switches the active session. Unknown ids change nothing, the draft included.
    pub fn select_session(&mut self, id: SessionId) -> bool {
        if !self.store.select_session(id) {
            return false;
        }

        self.composer.clear();
        true
    }

    pub fn select_pack(&mut self, index: usize) -> bool {
        let catalog = Arc::clone(&self.catalog);
        self.store
            .update_active(|session| selection::select_pack(session, &catalog, index))
            .unwrap_or(false)
    }

    pub fn double_click_pack(&mut self, index: usize) -> bool {
        let catalog = Arc::clone(&self.catalog);
        self.store
            .update_active(|session| selection::double_click_pack(session, &catalog, index))
            .unwrap_or(false)
    }

    /// Applies a pack chip click with its click count.
    ///
    /// A double click reaches the shell as a count-1 click followed by a
    /// count-2 click. The pair resolves like click, click, double click: the
    /// second toggle runs before the double-click handler.
    pub fn click_pack(&mut self, index: usize, click_count: usize) -> bool {
        if click_count < 2 {
            return self.select_pack(index);
        }

        self.select_pack(index) && self.double_click_pack(index)
    }

    pub fn select_skill(&mut self, skill_id: &str) -> DraftChange {
        let catalog = Arc::clone(&self.catalog);
        let change = self
            .store
            .update_active(|session| selection::select_skill(session, &catalog, skill_id))
            .unwrap_or(DraftChange::Keep);
        self.composer.apply(change.clone());
        change
    }

    /// Appends the trimmed user text and the canned reply to the active session.
    pub fn send_message(&mut self, text: &str) -> Option<SendOutcome> {
        let content = composer::normalize_submission(text)?.to_string();
        let session_id = self.store.active_id();

        let outcome = self.store.update_session(session_id, |session| {
            let user = Message::user(content.clone());
            let assistant = Message::assistant(ASSISTANT_ACK_TEXT);
            let outcome = SendOutcome {
                session_id,
                user_message_id: user.id,
                assistant_message_id: assistant.id,
                title_changed: session.lock_title_from(&content),
            };

            session.push_message(user);
            session.push_message(assistant);
            outcome
        })?;

        self.composer.clear();
        if outcome.title_changed {
            tracing::info!("session {session_id} titled from first message");
        }
        Some(outcome)
    }

    /// Sends whatever is currently in the composer.
    pub fn send_draft(&mut self) -> Option<SendOutcome> {
        let draft = self.composer.draft().to_string();
        self.send_message(&draft)
    }

    /// Mock image upload: posts a marker message naming the file.
    pub fn attach_image(&mut self, file_name: &str) -> Option<SendOutcome> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return None;
        }

        let draft = self.composer.draft().to_string();
        let outcome = self.send_message(&composer::image_upload_message(file_name));
        // Uploading does not consume what the user was typing.
        self.composer.set_draft(draft);
        outcome
    }

    pub fn composer_badge(&self) -> Option<String> {
        selection::composer_badge(self.store.active(), &self.catalog)
    }

    pub fn guidance(&self) -> Option<&Skill> {
        selection::selected_skill(self.store.active(), &self.catalog)
    }

    pub fn selection_is_consistent(&self) -> bool {
        self.store
            .list_sessions()
            .all(|session| selection::is_consistent(session, &self.catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionState;
    use crate::session::{DEFAULT_SESSION_TITLE, Role};

    fn workbench() -> Workbench {
        let catalog = SkillCatalog::builtin().expect("embedded catalog");
        Workbench::new(Arc::new(catalog))
    }

    #[test]
    fn send_appends_user_then_assistant_and_clears_draft() {
        let mut workbench = workbench();
        workbench.set_draft("  plan my launch  ");

        let outcome = workbench.send_draft().expect("non-empty draft is accepted");

        let messages = workbench.active_session().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "plan my launch");
        assert_eq!(messages[0].id, outcome.user_message_id);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, ASSISTANT_ACK_TEXT);
        assert_eq!(workbench.draft(), "");
    }

    #[test]
    fn blank_send_leaves_everything_untouched() {
        let mut workbench = workbench();
        workbench.set_draft("   ");

        assert!(workbench.send_draft().is_none());
        assert!(workbench.send_message("\n\t").is_none());
        assert!(workbench.active_session().messages().is_empty());
        assert_eq!(workbench.active_session().title, DEFAULT_SESSION_TITLE);
        assert_eq!(workbench.draft(), "   ");
    }

    #[test]
    fn title_is_taken_from_the_first_send_only() {
        let mut workbench = workbench();

        let first = workbench
            .send_message("this is a rather long opening message that goes on")
            .expect("send");
        assert!(first.title_changed);
        assert_eq!(
            workbench.active_session().title,
            "this is a rather long opening message th..."
        );

        let second = workbench.send_message("short").expect("send");
        assert!(!second.title_changed);
        assert_eq!(
            workbench.active_session().title,
            "this is a rather long opening message th..."
        );
    }

    #[test]
    fn seo_audit_walkthrough() {
        let mut workbench = workbench();
        assert_eq!(workbench.store().len(), 1);
        assert_eq!(workbench.active_session().title, DEFAULT_SESSION_TITLE);

        assert!(workbench.select_pack(0));
        let session = workbench.active_session();
        assert_eq!(session.selected_pack_index, Some(0));
        assert!(session.skills_expanded);
        assert_eq!(session.selected_skill, None);

        let change = workbench.select_skill("seo-audit");
        let expected_draft = workbench
            .catalog()
            .skill(0, "seo-audit")
            .map(|skill| skill.input_draft.clone())
            .expect("seo-audit exists");
        assert_eq!(change, DraftChange::Replace(expected_draft.clone()));
        assert_eq!(
            workbench.active_session().selected_skill.as_deref(),
            Some("seo-audit")
        );
        assert_eq!(workbench.draft(), expected_draft);
        assert_eq!(workbench.composer_badge().as_deref(), Some("Seo Audit"));

        workbench.send_message("audit my site").expect("send");
        assert_eq!(workbench.active_session().messages().len(), 2);
        assert_eq!(workbench.active_session().title, "audit my site");
        assert!(workbench.selection_is_consistent());
    }

    #[test]
    fn selecting_same_pack_twice_returns_to_none_each_time() {
        let mut workbench = workbench();

        for _ in 0..2 {
            workbench.select_pack(0);
            workbench.select_pack(0);
            let session = workbench.active_session();
            assert_eq!(SelectionState::of(session), SelectionState::None);
            assert!(!session.skills_expanded);
        }
    }

    fn double_click(workbench: &mut Workbench, index: usize) {
        workbench.click_pack(index, 1);
        workbench.click_pack(index, 2);
    }

    #[test]
    fn double_click_from_none_selects_and_expands() {
        let mut workbench = workbench();

        double_click(&mut workbench, 0);

        let session = workbench.active_session();
        assert_eq!(session.selected_pack_index(), Some(0));
        assert!(session.skills_expanded());
        assert_eq!(session.selected_skill(), None);
    }

    #[test]
    fn double_click_on_expanded_pack_collapses_it() {
        let mut workbench = workbench();
        workbench.click_pack(0, 1);
        workbench.select_skill("seo-audit");

        double_click(&mut workbench, 0);

        let session = workbench.active_session();
        assert_eq!(session.selected_pack_index(), Some(0));
        assert!(!session.skills_expanded());
        assert_eq!(session.selected_skill(), None);
        assert!(workbench.selection_is_consistent());
    }

    #[test]
    fn unknown_pack_clicks_are_ignored() {
        let mut workbench = workbench();

        assert!(!workbench.click_pack(999, 1));
        assert!(!workbench.click_pack(999, 2));
        assert_eq!(
            SelectionState::of(workbench.active_session()),
            SelectionState::None
        );
    }

    #[test]
    fn switching_sessions_isolates_state() {
        let mut workbench = workbench();
        let first = workbench.active_id();
        workbench.select_pack(0);
        workbench.select_skill("paid-ads");
        workbench.send_message("run ads").expect("send");
        let first_snapshot = workbench.active_session().clone();

        let second = workbench.create_session();
        assert_eq!(workbench.active_id(), second);
        assert_eq!(workbench.draft(), "");
        workbench.select_pack(0);
        workbench.send_message("other thread").expect("send");

        assert!(workbench.select_session(first));
        assert_eq!(workbench.active_session(), &first_snapshot);
        assert_eq!(workbench.store().len(), 2);
    }

    #[test]
    fn session_switch_clears_draft_but_unknown_id_does_not() {
        let mut workbench = workbench();
        let first = workbench.active_id();
        workbench.set_draft("half typed");

        assert!(!workbench.select_session(SessionId::new_v7()));
        assert_eq!(workbench.draft(), "half typed");

        assert!(workbench.select_session(first));
        assert_eq!(workbench.draft(), "");
    }

    #[test]
    fn reselecting_skill_clears_draft() {
        let mut workbench = workbench();
        workbench.select_pack(0);
        workbench.select_skill("copywriting");
        assert!(!workbench.draft().is_empty());

        assert_eq!(workbench.select_skill("copywriting"), DraftChange::Clear);
        assert_eq!(workbench.draft(), "");
        assert!(workbench.guidance().is_none());
    }

    #[test]
    fn image_upload_posts_marker_and_keeps_draft() {
        let mut workbench = workbench();
        workbench.set_draft("caption");

        workbench.attach_image("banner.png").expect("upload");

        let messages = workbench.active_session().messages();
        assert_eq!(messages[0].content, "[📎 Uploaded image: banner.png]");
        assert_eq!(workbench.draft(), "caption");
        assert!(workbench.attach_image("  ").is_none());
    }
}
