//! Pack and skill selection, scoped to one session.
//!
//! Canonical rules:
//! - clicking the active pack deselects it, clicking any other pack switches to it
//!   with the skills list expanded and no skill chosen;
//! - double-clicking a pack makes it active and toggles the skills list;
//! - clicking the selected skill again clears it along with the draft.

use super::catalog::{Skill, SkillCatalog};
use super::session::Session;

/// Derived view of a session's selection fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState<'a> {
    None,
    PackSelected {
        pack_index: usize,
        expanded: bool,
    },
    SkillSelected {
        pack_index: usize,
        skill_id: &'a str,
        expanded: bool,
    },
}

impl<'a> SelectionState<'a> {
    pub fn of(session: &'a Session) -> Self {
        match (session.selected_pack_index, session.selected_skill.as_deref()) {
            (None, _) => Self::None,
            (Some(pack_index), None) => Self::PackSelected {
                pack_index,
                expanded: session.skills_expanded,
            },
            (Some(pack_index), Some(skill_id)) => Self::SkillSelected {
                pack_index,
                skill_id,
                expanded: session.skills_expanded,
            },
        }
    }

    pub fn pack_index(&self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::PackSelected { pack_index, .. } | Self::SkillSelected { pack_index, .. } => {
                Some(*pack_index)
            }
        }
    }
}

/// What the composer should do with its draft after a selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftChange {
    Keep,
    Replace(String),
    Clear,
}

/// Single click on a pack chip. Returns `false` when the index is unknown.
pub fn select_pack(session: &mut Session, catalog: &SkillCatalog, index: usize) -> bool {
    if catalog.pack(index).is_none() {
        tracing::debug!("ignoring click on unknown pack index {index}");
        return false;
    }

    if session.selected_pack_index == Some(index) {
        clear_selection(session);
    } else {
        session.selected_pack_index = Some(index);
        session.selected_skill = None;
        session.skills_expanded = true;
    }

    true
}

/// Double click on a pack chip. Returns `false` when the index is unknown.
pub fn double_click_pack(session: &mut Session, catalog: &SkillCatalog, index: usize) -> bool {
    if catalog.pack(index).is_none() {
        tracing::debug!("ignoring double click on unknown pack index {index}");
        return false;
    }

    if session.selected_pack_index != Some(index) {
        session.selected_skill = None;
    }
    session.selected_pack_index = Some(index);
    session.skills_expanded = !session.skills_expanded;
    true
}

/// Click on a skill inside the active pack.
pub fn select_skill(session: &mut Session, catalog: &SkillCatalog, skill_id: &str) -> DraftChange {
    let Some(pack_index) = session.selected_pack_index else {
        tracing::debug!("ignoring skill '{skill_id}' with no active pack");
        return DraftChange::Keep;
    };

    let Some(skill) = catalog.skill(pack_index, skill_id) else {
        tracing::debug!("ignoring skill '{skill_id}' outside pack {pack_index}");
        return DraftChange::Keep;
    };

    if session.selected_skill.as_deref() == Some(skill_id) {
        session.selected_skill = None;
        return DraftChange::Clear;
    }

    session.selected_skill = Some(skill.id.clone());
    DraftChange::Replace(skill.input_draft.clone())
}

pub fn clear_selection(session: &mut Session) {
    session.selected_pack_index = None;
    session.selected_skill = None;
    session.skills_expanded = false;
}

/// The skill whose guidance card should be shown, if any.
pub fn selected_skill<'a>(session: &Session, catalog: &'a SkillCatalog) -> Option<&'a Skill> {
    let pack_index = session.selected_pack_index?;
    catalog.skill(pack_index, session.selected_skill.as_deref()?)
}

/// Label shown above the composer: skill name first, then pack.
pub fn composer_badge(session: &Session, catalog: &SkillCatalog) -> Option<String> {
    if let Some(skill) = selected_skill(session, catalog) {
        return Some(skill.display_name());
    }

    session
        .selected_pack_index
        .and_then(|index| catalog.pack(index))
        .map(|pack| pack.label())
}

/// Checks that a selected skill always lives in the selected pack.
pub fn is_consistent(session: &Session, catalog: &SkillCatalog) -> bool {
    match SelectionState::of(session) {
        SelectionState::None => session.selected_skill.is_none(),
        SelectionState::PackSelected { pack_index, .. } => catalog.pack(pack_index).is_some(),
        SelectionState::SkillSelected {
            pack_index,
            skill_id,
            ..
        } => catalog.skill(pack_index, skill_id).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pack_catalog() -> SkillCatalog {
        SkillCatalog::from_json(
            r#"{
                "version": 1,
                "packs": [
                    {"name": "Marketing", "icon": "M", "skills": [
                        {"skill": "seo-audit", "description": "d", "prompt_message": "p1", "input_draft": "draft seo"},
                        {"skill": "paid-ads", "description": "d", "prompt_message": "p2", "input_draft": "draft ads"}
                    ]},
                    {"name": "Writing", "icon": "W", "skills": [
                        {"skill": "copy-editing", "description": "d", "prompt_message": "p3", "input_draft": "draft copy"}
                    ]}
                ]
            }"#,
        )
        .expect("fixture catalog")
    }

    #[test]
    fn first_pack_click_expands_without_skill() {
        let catalog = two_pack_catalog();
        let mut session = Session::new();

        assert!(select_pack(&mut session, &catalog, 0));
        assert_eq!(
            SelectionState::of(&session),
            SelectionState::PackSelected {
                pack_index: 0,
                expanded: true
            }
        );
    }

    #[test]
    fn clicking_active_pack_returns_to_none() {
        let catalog = two_pack_catalog();
        let mut session = Session::new();

        select_pack(&mut session, &catalog, 0);
        select_skill(&mut session, &catalog, "seo-audit");
        select_pack(&mut session, &catalog, 0);

        assert_eq!(SelectionState::of(&session), SelectionState::None);
        assert!(!session.skills_expanded);
        assert_eq!(session.selected_skill, None);
    }

    #[test]
    fn switching_packs_clears_the_skill() {
        let catalog = two_pack_catalog();
        let mut session = Session::new();

        select_pack(&mut session, &catalog, 0);
        select_skill(&mut session, &catalog, "seo-audit");
        select_pack(&mut session, &catalog, 1);

        assert_eq!(session.selected_pack_index, Some(1));
        assert_eq!(session.selected_skill, None);
        assert!(session.skills_expanded);
        assert!(is_consistent(&session, &catalog));
    }

    #[test]
    fn unknown_pack_index_is_ignored() {
        let catalog = two_pack_catalog();
        let mut session = Session::new();

        assert!(!select_pack(&mut session, &catalog, 7));
        assert!(!double_click_pack(&mut session, &catalog, 7));
        assert_eq!(SelectionState::of(&session), SelectionState::None);
    }

    #[test]
    fn double_click_toggles_expansion_and_keeps_skill_on_same_pack() {
        let catalog = two_pack_catalog();
        let mut session = Session::new();

        select_pack(&mut session, &catalog, 0);
        select_skill(&mut session, &catalog, "paid-ads");

        double_click_pack(&mut session, &catalog, 0);
        assert!(!session.skills_expanded);
        assert_eq!(session.selected_skill.as_deref(), Some("paid-ads"));

        double_click_pack(&mut session, &catalog, 0);
        assert!(session.skills_expanded);

        double_click_pack(&mut session, &catalog, 1);
        assert_eq!(session.selected_pack_index, Some(1));
        assert_eq!(session.selected_skill, None);
        assert!(is_consistent(&session, &catalog));
    }

    #[test]
    fn double_click_from_none_selects_and_expands() {
        let catalog = two_pack_catalog();
        let mut session = Session::new();

        double_click_pack(&mut session, &catalog, 1);
        assert_eq!(
            SelectionState::of(&session),
            SelectionState::PackSelected {
                pack_index: 1,
                expanded: true
            }
        );
    }

    #[test]
    fn skill_selection_prefills_and_reclick_clears() {
        let catalog = two_pack_catalog();
        let mut session = Session::new();

        assert_eq!(
            select_skill(&mut session, &catalog, "seo-audit"),
            DraftChange::Keep
        );

        select_pack(&mut session, &catalog, 0);
        assert_eq!(
            select_skill(&mut session, &catalog, "seo-audit"),
            DraftChange::Replace("draft seo".to_string())
        );
        assert_eq!(
            select_skill(&mut session, &catalog, "paid-ads"),
            DraftChange::Replace("draft ads".to_string())
        );
        assert_eq!(
            select_skill(&mut session, &catalog, "paid-ads"),
            DraftChange::Clear
        );
        assert_eq!(session.selected_skill, None);
        assert_eq!(session.selected_pack_index, Some(0));
    }

    #[test]
    fn skill_from_another_pack_is_ignored() {
        let catalog = two_pack_catalog();
        let mut session = Session::new();

        select_pack(&mut session, &catalog, 0);
        assert_eq!(
            select_skill(&mut session, &catalog, "copy-editing"),
            DraftChange::Keep
        );
        assert_eq!(session.selected_skill, None);
    }

    #[test]
    fn badge_prefers_skill_over_pack() {
        let catalog = two_pack_catalog();
        let mut session = Session::new();
        assert_eq!(composer_badge(&session, &catalog), None);

        select_pack(&mut session, &catalog, 0);
        assert_eq!(
            composer_badge(&session, &catalog).as_deref(),
            Some("M Marketing")
        );

        select_skill(&mut session, &catalog, "seo-audit");
        assert_eq!(
            composer_badge(&session, &catalog).as_deref(),
            Some("Seo Audit")
        );
        assert_eq!(
            selected_skill(&session, &catalog).map(|skill| skill.prompt_message.as_str()),
            Some("p1")
        );
    }

    #[test]
    fn invariant_holds_across_a_click_sequence() {
        let catalog = two_pack_catalog();
        let mut session = Session::new();
        let steps: [(&str, usize, &str); 10] = [
            ("pack", 0, ""),
            ("skill", 0, "seo-audit"),
            ("double", 1, ""),
            ("skill", 0, "copy-editing"),
            ("pack", 0, ""),
            ("skill", 0, "paid-ads"),
            ("pack", 0, ""),
            ("skill", 0, "seo-audit"),
            ("double", 0, ""),
            ("pack", 1, ""),
        ];

        for (kind, index, skill) in steps {
            match kind {
                "pack" => {
                    select_pack(&mut session, &catalog, index);
                }
                "double" => {
                    double_click_pack(&mut session, &catalog, index);
                }
                _ => {
                    select_skill(&mut session, &catalog, skill);
                }
            }
            assert!(is_consistent(&session, &catalog), "after {kind} {index} {skill}");
        }
    }
}
