use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, IndexPath, Sizable, ThemeMode, ThemeRegistry,
    button::{Button, ButtonVariants},
    h_flex,
    select::{Select, SelectState},
    v_flex,
};
use skillbench_workbench::{AVAILABLE_MODELS, WorkbenchSettings};

use crate::settings::state::{SettingsState, theme_mode, theme_mode_setting};

pub struct SettingsView {
    state: Entity<SettingsState>,
    theme_preset_select: Entity<SelectState<Vec<SharedString>>>,
    theme_mode: ThemeMode,
    model_id: String,
    error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsClose;

impl EventEmitter<SettingsClose> for SettingsView {}

impl SettingsView {
    fn theme_names(cx: &App) -> Vec<SharedString> {
        ThemeRegistry::global(cx)
            .sorted_themes()
            .iter()
            .map(|theme| theme.name.clone())
            .collect()
    }

    fn selected_theme_index(theme_names: &[SharedString], selected: &str) -> Option<IndexPath> {
        if selected.is_empty() {
            return None;
        }

        theme_names
            .iter()
            .position(|theme_name| theme_name.as_ref() == selected)
            .map(|index| IndexPath::default().row(index))
    }

    pub fn new(state: &Entity<SettingsState>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let settings = state.read(cx).settings();

        let theme_names = Self::theme_names(cx);
        let selected_theme_index = Self::selected_theme_index(&theme_names, &settings.theme_name);
        let theme_preset_select = cx.new(|cx| {
            SelectState::new(theme_names, selected_theme_index, window, cx).searchable(true)
        });

        Self {
            state: state.clone(),
            theme_preset_select,
            theme_mode: theme_mode(settings.theme_mode),
            model_id: settings.model_id.clone(),
            error_message: None,
        }
    }

    fn select_mode(&mut self, mode: ThemeMode, cx: &mut Context<Self>) {
        self.theme_mode = mode;
        cx.notify();
    }

    fn select_model(&mut self, model_id: &str, cx: &mut Context<Self>) {
        self.model_id = model_id.to_string();
        cx.notify();
    }

    fn save_settings(&mut self, _event: &ClickEvent, _window: &mut Window, cx: &mut Context<Self>) {
        let theme_name = self
            .theme_preset_select
            .read(cx)
            .selected_value()
            .map(|theme_name| theme_name.to_string())
            .unwrap_or_default();

        let new_settings = WorkbenchSettings {
            theme_mode: theme_mode_setting(self.theme_mode),
            theme_name,
            model_id: self.model_id.clone(),
        };

        match self
            .state
            .update(cx, |state, cx| state.update_settings(new_settings, cx))
        {
            Ok(()) => {
                self.error_message = None;
                cx.emit(SettingsClose);
            }
            Err(error) => {
                tracing::error!("failed to save settings: {error}");
                self.error_message = Some(format!("Failed to save settings: {error}"));
            }
        }
        cx.notify();
    }

    fn cancel(&mut self, _event: &ClickEvent, _window: &mut Window, cx: &mut Context<Self>) {
        self.error_message = None;
        cx.emit(SettingsClose);
        cx.notify();
    }

    fn render_section(title: &'static str, body: impl IntoElement, cx: &App) -> impl IntoElement {
        v_flex()
            .gap_1()
            .child(
                div()
                    .text_sm()
                    .text_color(cx.theme().foreground)
                    .child(title),
            )
            .child(body)
    }
}

impl Render for SettingsView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let mode_buttons = h_flex()
            .gap_2()
            .children([("Light", ThemeMode::Light), ("Dark", ThemeMode::Dark)].map(
                |(label, mode)| {
                    let is_active = self.theme_mode == mode;
                    Button::new(SharedString::from(format!("settings-theme-{label}")))
                        .small()
                        .when(is_active, |button| button.primary())
                        .when(!is_active, |button| button.ghost())
                        .child(label)
                        .on_click(cx.listener(move |this, _, _window, cx| {
                            this.select_mode(mode, cx);
                        }))
                },
            ));

        let model_buttons = h_flex()
            .gap_2()
            .flex_wrap()
            .children(AVAILABLE_MODELS.iter().map(|model| {
                let is_active = self.model_id == model.id;
                let model_id = model.id;
                Button::new(SharedString::from(format!("settings-model-{model_id}")))
                    .small()
                    .when(is_active, |button| button.primary())
                    .when(!is_active, |button| button.ghost())
                    .child(model.label)
                    .on_click(cx.listener(move |this, _, _window, cx| {
                        this.select_model(model_id, cx);
                    }))
            }));

        let preset_select = Select::new(&self.theme_preset_select)
            .w_full()
            .placeholder("Follow mode")
            .search_placeholder("Search theme preset")
            .cleanable(true);

        let theme = cx.theme();

        v_flex()
            .id("settings-view")
            .size_full()
            .gap_4()
            .p_6()
            .pt_10()
            .bg(theme.background)
            .child(
                div()
                    .text_lg()
                    .font_weight(FontWeight::SEMIBOLD)
                    .text_color(theme.foreground)
                    .child("Settings"),
            )
            .child(Self::render_section("Theme Mode", mode_buttons, cx))
            .child(Self::render_section("Theme Preset", preset_select, cx))
            .child(Self::render_section("Model", model_buttons, cx))
            .when_some(self.error_message.clone(), |el, error| {
                el.child(div().text_sm().text_color(cx.theme().danger).child(error))
            })
            .child(
                h_flex()
                    .gap_2()
                    .justify_end()
                    .child(
                        Button::new("settings-cancel")
                            .ghost()
                            .small()
                            .child("Cancel")
                            .on_click(cx.listener(Self::cancel)),
                    )
                    .child(
                        Button::new("settings-save")
                            .primary()
                            .small()
                            .child("Save")
                            .on_click(cx.listener(Self::save_settings)),
                    ),
            )
    }
}
