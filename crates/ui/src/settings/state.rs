use std::sync::Arc;

use gpui::*;
use gpui_component::{Theme, ThemeMode, ThemeRegistry};
use skillbench_workbench::{SettingsError, SettingsStore, ThemeModeSetting, WorkbenchSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChanged {
    pub settings: WorkbenchSettings,
}

/// Entity wrapper so views can observe settings changes.
pub struct SettingsState {
    store: SettingsStore,
}

impl EventEmitter<SettingsChanged> for SettingsState {}

impl SettingsState {
    pub fn new(cx: &mut App) -> Entity<Self> {
        cx.new(|_| Self {
            store: SettingsStore::load(),
        })
    }

    pub fn settings(&self) -> Arc<WorkbenchSettings> {
        self.store.settings()
    }

    pub fn update_settings(
        &mut self,
        settings: WorkbenchSettings,
        cx: &mut Context<Self>,
    ) -> Result<(), SettingsError> {
        self.store.update(settings)?;
        cx.emit(SettingsChanged {
            settings: self.store.settings().as_ref().clone(),
        });
        cx.notify();
        Ok(())
    }

    pub fn set_model(&mut self, model_id: &str, cx: &mut Context<Self>) -> Result<(), SettingsError> {
        let mut settings = self.settings().as_ref().clone();
        settings.model_id = model_id.to_string();
        self.update_settings(settings, cx)
    }
}

pub fn theme_mode(setting: ThemeModeSetting) -> ThemeMode {
    match setting {
        ThemeModeSetting::Light => ThemeMode::Light,
        ThemeModeSetting::Dark => ThemeMode::Dark,
    }
}

pub fn theme_mode_setting(mode: ThemeMode) -> ThemeModeSetting {
    if mode.is_dark() {
        ThemeModeSetting::Dark
    } else {
        ThemeModeSetting::Light
    }
}

/// A named preset wins over the plain light/dark mode when it is registered.
pub fn apply_theme(settings: &WorkbenchSettings, window: Option<&mut Window>, cx: &mut App) {
    if let Some(theme_config) = ThemeRegistry::global(cx)
        .themes()
        .get(&SharedString::from(settings.theme_name.clone()))
        .cloned()
    {
        let mode = theme_config.mode;
        let theme = Theme::global_mut(cx);
        if mode.is_dark() {
            theme.dark_theme = theme_config;
        } else {
            theme.light_theme = theme_config;
        }
        Theme::change(mode, window, cx);
        return;
    }

    Theme::change(theme_mode(settings.theme_mode), window, cx);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_mode_mapping_roundtrips() {
        for setting in [ThemeModeSetting::Light, ThemeModeSetting::Dark] {
            assert_eq!(theme_mode_setting(theme_mode(setting)), setting);
        }
    }
}
