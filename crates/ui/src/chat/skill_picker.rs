use std::sync::Arc;

use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};
use skillbench_workbench::{SelectionState, Session, Skill, SkillCatalog};

use crate::chat::events::{PackClicked, SkillClicked};

/// Pack chips, the expandable skill list and the guidance card for the chosen skill.
pub struct SkillPicker {
    catalog: Arc<SkillCatalog>,
    pack_index: Option<usize>,
    skill_id: Option<String>,
    expanded: bool,
}

impl EventEmitter<PackClicked> for SkillPicker {}
impl EventEmitter<SkillClicked> for SkillPicker {}

impl SkillPicker {
    pub fn new(catalog: Arc<SkillCatalog>) -> Self {
        Self {
            catalog,
            pack_index: None,
            skill_id: None,
            expanded: false,
        }
    }

    /// Mirrors the active session's selection fields.
    pub fn sync(&mut self, session: &Session, cx: &mut Context<Self>) {
        let (pack_index, skill_id, expanded) = match SelectionState::of(session) {
            SelectionState::None => (None, None, false),
            SelectionState::PackSelected {
                pack_index,
                expanded,
            } => (Some(pack_index), None, expanded),
            SelectionState::SkillSelected {
                pack_index,
                skill_id,
                expanded,
            } => (Some(pack_index), Some(skill_id.to_string()), expanded),
        };

        self.pack_index = pack_index;
        self.skill_id = skill_id;
        self.expanded = expanded;
        cx.notify();
    }

    fn selected_skill(&self) -> Option<&Skill> {
        self.catalog
            .skill(self.pack_index?, self.skill_id.as_deref()?)
    }

    fn render_pack_chips(&self, cx: &mut Context<Self>) -> AnyElement {
        h_flex()
            .id("skill-pack-chips")
            .gap_2()
            .flex_wrap()
            .children(self.catalog.packs().iter().enumerate().map(|(index, pack)| {
                let is_active = self.pack_index == Some(index);

                Button::new(("skill-pack", index))
                    .small()
                    .when(is_active, |button| button.primary())
                    .when(!is_active, |button| button.ghost())
                    .child(pack.label())
                    .on_click(cx.listener(move |_, event: &ClickEvent, _window, cx| {
                        cx.emit(PackClicked::from_click_count(index, event.click_count()));
                    }))
            }))
            .into_any_element()
    }

    fn render_skill_list(&self, pack_index: usize, cx: &mut Context<Self>) -> AnyElement {
        let theme = cx.theme();
        let Some(pack) = self.catalog.pack(pack_index) else {
            return div().into_any_element();
        };

        v_flex()
            .id("skill-list")
            .gap_1()
            .max_h(px(240.))
            .overflow_y_scroll()
            .children(pack.skills.iter().map(|skill| {
                let skill_id = skill.id.clone();
                let is_selected = self.skill_id.as_deref() == Some(skill.id.as_str());

                h_flex()
                    .id(ElementId::Name(format!("skill-{}", skill.id).into()))
                    .w_full()
                    .px_3()
                    .py_2()
                    .gap_3()
                    .rounded_md()
                    .cursor_pointer()
                    .when(is_selected, |row| row.bg(theme.primary.opacity(0.12)))
                    .when(!is_selected, |row| {
                        row.hover(|row| row.bg(theme.muted.opacity(0.5)))
                    })
                    .on_click(cx.listener(move |_, _event: &ClickEvent, _window, cx| {
                        cx.emit(SkillClicked {
                            skill_id: skill_id.clone(),
                        });
                    }))
                    .child(
                        div()
                            .w(px(180.))
                            .flex_shrink_0()
                            .text_sm()
                            .font_weight(FontWeight::MEDIUM)
                            .text_color(theme.foreground)
                            .child(skill.display_name()),
                    )
                    .child(
                        div()
                            .flex_1()
                            .min_w_0()
                            .truncate()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child(skill.description.clone()),
                    )
            }))
            .into_any_element()
    }

    fn render_guidance(&self, skill: &Skill, cx: &App) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("skill-guidance")
            .gap_1()
            .p_3()
            .rounded_lg()
            .border_1()
            .border_color(theme.border)
            .bg(theme.muted.opacity(0.4))
            .child(
                Label::new(skill.display_name())
                    .text_xs()
                    .text_color(theme.muted_foreground),
            )
            .child(Label::new(skill.prompt_message.clone()).text_sm())
    }
}

impl Render for SkillPicker {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let expanded_pack = self.pack_index.filter(|_| self.expanded);
        let guidance = self
            .selected_skill()
            .map(|skill| self.render_guidance(skill, cx).into_any_element());

        v_flex()
            .id("skill-picker")
            .w_full()
            .gap_2()
            .px_4()
            .py_3()
            .child(self.render_pack_chips(cx))
            .when_some(expanded_pack, |column, pack_index| {
                column.child(self.render_skill_list(pack_index, cx))
            })
            .when_some(guidance, |column, guidance| column.child(guidance))
    }
}
