use skillbench_workbench::SessionId;

/// Emitted when a history row is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSelected {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewSessionClicked;

/// Emitted when the user submits the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submit {
    pub content: String,
}

impl Submit {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Emitted on every edit of the composer text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEdited {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachImageClicked;

/// Pack chip interactions. A double click arrives as a single click followed
/// by a click with `click_count == 2`; `Workbench::click_pack` resolves the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackClicked {
    Single { pack_index: usize },
    Double { pack_index: usize },
}

impl PackClicked {
    pub fn from_click_count(pack_index: usize, click_count: usize) -> Self {
        if click_count >= 2 {
            Self::Double { pack_index }
        } else {
            Self::Single { pack_index }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillClicked {
    pub skill_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_count_maps_to_pack_gesture() {
        assert_eq!(
            PackClicked::from_click_count(1, 1),
            PackClicked::Single { pack_index: 1 }
        );
        assert_eq!(
            PackClicked::from_click_count(0, 2),
            PackClicked::Double { pack_index: 0 }
        );
        assert_eq!(
            PackClicked::from_click_count(0, 3),
            PackClicked::Double { pack_index: 0 }
        );
    }
}
