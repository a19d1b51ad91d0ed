use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::ids::{MessageId, SessionId};

/// Title every session starts with until the first send replaces it.
pub const DEFAULT_SESSION_TITLE: &str = "New Session";
/// Number of characters of the first user message kept in the title.
pub const TITLE_MAX_CHARS: usize = 40;
pub const TITLE_ELLIPSIS: &str = "...";

/// Canned acknowledgment appended after every user message.
pub const ASSISTANT_ACK_TEXT: &str = "Thanks for the details! Let me analyze this and put together a comprehensive plan for you. I'll break it down into actionable steps.";

/// Chat speaker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp_unix_millis: u64,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new_v7(),
            role,
            content: content.into(),
            timestamp_unix_millis: unix_now_millis(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// One independent chat thread with its own transcript and selection state.
///
/// Selection fields are only mutated through [`crate::selection`], which keeps
/// `selected_skill` inside the pack at `selected_pack_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub(crate) title: String,
    messages: Vec<Message>,
    pub(crate) selected_pack_index: Option<usize>,
    pub(crate) selected_skill: Option<String>,
    pub(crate) skills_expanded: bool,
    created_at_unix_millis: u64,
    title_locked: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::with_created_at(unix_now_millis())
    }

    pub fn with_created_at(created_at_unix_millis: u64) -> Self {
        Self {
            id: SessionId::new_v7(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            selected_pack_index: None,
            selected_skill: None,
            skills_expanded: false,
            created_at_unix_millis,
            title_locked: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn selected_pack_index(&self) -> Option<usize> {
        self.selected_pack_index
    }

    pub fn selected_skill(&self) -> Option<&str> {
        self.selected_skill.as_deref()
    }

    pub fn skills_expanded(&self) -> bool {
        self.skills_expanded
    }

    pub fn created_at_unix_millis(&self) -> u64 {
        self.created_at_unix_millis
    }

    pub fn is_title_locked(&self) -> bool {
        self.title_locked
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Sets the title from content once; later calls are ignored.
    pub fn lock_title_from(&mut self, content: &str) -> bool {
        if self.title_locked {
            return false;
        }

        self.title = title_from_content(content);
        self.title_locked = true;
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncates to [`TITLE_MAX_CHARS`] characters, marking cut titles with an ellipsis.
pub fn title_from_content(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}{TITLE_ELLIPSIS}")
    } else {
        head
    }
}

pub fn unix_now_millis() -> u64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0));
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_becomes_title_verbatim() {
        assert_eq!(title_from_content("audit my site"), "audit my site");
    }

    #[test]
    fn exactly_forty_chars_is_not_truncated() {
        let content = "a".repeat(TITLE_MAX_CHARS);
        assert_eq!(title_from_content(&content), content);
    }

    #[test]
    fn long_content_is_cut_on_char_boundaries() {
        let content = "é".repeat(TITLE_MAX_CHARS + 5);
        let title = title_from_content(&content);
        assert_eq!(title, format!("{}...", "é".repeat(TITLE_MAX_CHARS)));
    }

    #[test]
    fn title_locks_after_first_write() {
        let mut session = Session::new();
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);

        assert!(session.lock_title_from("first"));
        assert!(!session.lock_title_from("second"));
        assert_eq!(session.title, "first");
    }
}
