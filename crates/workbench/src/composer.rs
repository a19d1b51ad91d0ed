use super::selection::DraftChange;

/// Transient text in the message box. Not owned by any session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    draft: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn clear(&mut self) {
        self.draft.clear();
    }

    /// Mirrors the disabled state of the send button.
    pub fn can_send(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    pub fn apply(&mut self, change: DraftChange) {
        match change {
            DraftChange::Keep => {}
            DraftChange::Replace(draft) => self.draft = draft,
            DraftChange::Clear => self.draft.clear(),
        }
    }
}

/// Trims surrounding whitespace; `None` for empty submissions.
pub fn normalize_submission(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

pub fn image_upload_message(file_name: &str) -> String {
    format!("[📎 Uploaded image: {file_name}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_drafts_cannot_be_sent() {
        let mut composer = Composer::new();
        assert!(!composer.can_send());

        composer.set_draft(" \n\t ");
        assert!(!composer.can_send());
        assert_eq!(normalize_submission(composer.draft()), None);

        composer.set_draft("  hi  ");
        assert!(composer.can_send());
        assert_eq!(normalize_submission(composer.draft()), Some("hi"));
    }

    #[test]
    fn upload_message_carries_the_attachment_marker() {
        assert_eq!(
            image_upload_message("hero.webp"),
            "[📎 Uploaded image: hero.webp]"
        );
    }

    #[test]
    fn draft_changes_apply_in_place() {
        let mut composer = Composer::new();
        composer.set_draft("typed");

        composer.apply(DraftChange::Keep);
        assert_eq!(composer.draft(), "typed");

        composer.apply(DraftChange::Replace("template".to_string()));
        assert_eq!(composer.draft(), "template");

        composer.apply(DraftChange::Clear);
        assert_eq!(composer.draft(), "");
    }
}
