use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, Icon, IconName, Selectable, Sizable,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};
use skillbench_workbench::{AVAILABLE_MODELS, ModelOption};

/// Top-bar dropdown over the fixed model list. The choice is display-only.
pub struct ModelSelector {
    current_model_id: String,
    is_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelected {
    pub model_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSelectorSettingsClicked;

impl EventEmitter<ModelSelected> for ModelSelector {}
impl EventEmitter<ModelSelectorSettingsClicked> for ModelSelector {}

impl ModelSelector {
    pub fn new(current_model_id: impl Into<String>) -> Self {
        Self {
            current_model_id: current_model_id.into(),
            is_open: false,
        }
    }

    pub fn set_model_id(&mut self, model_id: impl Into<String>, cx: &mut Context<Self>) {
        self.current_model_id = model_id.into();
        cx.notify();
    }

    fn toggle_open(&mut self, _event: &ClickEvent, _window: &mut Window, cx: &mut Context<Self>) {
        self.is_open = !self.is_open;
        cx.notify();
    }

    fn select_model(&mut self, model_id: &str, cx: &mut Context<Self>) {
        self.is_open = false;
        if self.current_model_id != model_id {
            self.current_model_id = model_id.to_string();
            cx.emit(ModelSelected {
                model_id: model_id.to_string(),
            });
        }
        cx.notify();
    }

    fn open_settings(&mut self, _event: &ClickEvent, _window: &mut Window, cx: &mut Context<Self>) {
        self.is_open = false;
        cx.emit(ModelSelectorSettingsClicked);
        cx.notify();
    }

    fn current_model_label(&self) -> &'static str {
        display_label(&self.current_model_id)
    }

    fn render_option(&self, model: &'static ModelOption, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();
        let is_selected = model.id == self.current_model_id;

        h_flex()
            .id(ElementId::Name(format!("model-option-{}", model.id).into()))
            .px_3()
            .py_2()
            .gap_2()
            .items_center()
            .cursor_pointer()
            .when(is_selected, |element| element.bg(theme.primary.opacity(0.1)))
            .when(!is_selected, |element| {
                element.hover(|element| element.bg(theme.muted.opacity(0.5)))
            })
            .on_click(cx.listener(move |this, _event, _window, cx| {
                this.select_model(model.id, cx);
            }))
            .child(
                div()
                    .flex_1()
                    .text_sm()
                    .text_color(theme.foreground)
                    .child(model.label),
            )
            .when(is_selected, |element| {
                element.child(
                    Icon::new(IconName::Check)
                        .size(px(16.))
                        .text_color(theme.primary),
                )
            })
            .into_any_element()
    }
}

/// Label shown for a model id; unknown ids fall back to the first offered model.
pub fn display_label(model_id: &str) -> &'static str {
    AVAILABLE_MODELS
        .iter()
        .find(|model| model.id == model_id)
        .or_else(|| AVAILABLE_MODELS.first())
        .map(|model| model.label)
        .unwrap_or_default()
}

impl Render for ModelSelector {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let is_open = self.is_open;

        h_flex()
            .id("model-selector")
            .relative()
            .child(
                Button::new("model-selector-button")
                    .ghost()
                    .small()
                    .child(self.current_model_label())
                    .when(is_open, |button| button.selected(true))
                    .on_click(cx.listener(Self::toggle_open)),
            )
            .when(is_open, |element| {
                element.child(
                    v_flex()
                        .id("model-selector-dropdown")
                        .absolute()
                        .top(px(32.))
                        .right_0()
                        .w(px(260.))
                        .bg(theme.popover)
                        .rounded_md()
                        .shadow_md()
                        .border_1()
                        .border_color(theme.border)
                        .py_1()
                        .child(
                            h_flex()
                                .px_3()
                                .py_2()
                                .border_b_1()
                                .border_color(theme.border)
                                .justify_between()
                                .items_center()
                                .child(
                                    div()
                                        .text_sm()
                                        .font_weight(FontWeight::SEMIBOLD)
                                        .text_color(theme.foreground)
                                        .child("Select Model"),
                                )
                                .child(
                                    Button::new("model-selector-settings")
                                        .ghost()
                                        .xsmall()
                                        .icon(IconName::Settings)
                                        .child("Settings")
                                        .on_click(cx.listener(Self::open_settings)),
                                ),
                        )
                        .children(
                            AVAILABLE_MODELS
                                .iter()
                                .map(|model| self.render_option(model, cx)),
                        ),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_model_ids_show_the_default_label() {
        assert_eq!(display_label("claude-opus-4"), "Claude Opus 4");
        assert_eq!(display_label("gpt-unknown"), AVAILABLE_MODELS[0].label);
    }
}
