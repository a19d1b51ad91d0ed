use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

pub const SETTINGS_DIRECTORY_NAME: &str = "skillbench";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Display-only model choice offered by the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub id: &'static str,
    pub label: &'static str,
}

pub const AVAILABLE_MODELS: &[ModelOption] = &[
    ModelOption {
        id: "claude-sonnet-4-5",
        label: "Claude Sonnet 4.5",
    },
    ModelOption {
        id: "claude-opus-4",
        label: "Claude Opus 4",
    },
];

pub fn model_option(id: &str) -> Option<&'static ModelOption> {
    AVAILABLE_MODELS.iter().find(|model| model.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeModeSetting {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbenchSettings {
    #[serde(default)]
    pub theme_mode: ThemeModeSetting,
    #[serde(default)]
    pub theme_name: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeModeSetting::default(),
            theme_name: String::new(),
            model_id: default_model_id(),
        }
    }
}

impl WorkbenchSettings {
    pub fn normalized(mut self) -> Self {
        self.theme_name = self.theme_name.trim().to_string();

        // Unknown model ids fall back to the first offered model.
        let model_id = self.model_id.trim();
        self.model_id = match model_option(model_id) {
            Some(model) => model.id.to_string(),
            None => default_model_id(),
        };

        self
    }

    pub fn model(&self) -> &'static ModelOption {
        model_option(&self.model_id).unwrap_or(&AVAILABLE_MODELS[0])
    }
}

pub struct SettingsStore {
    settings: Arc<ArcSwap<WorkbenchSettings>>,
    config_path: PathBuf,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".skillbench"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_from_disk(&config_path);
        Self {
            settings: Arc::new(ArcSwap::from_pointee(settings)),
            config_path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> Arc<WorkbenchSettings> {
        self.settings.load_full()
    }

    pub fn update(&self, settings: WorkbenchSettings) -> Result<(), SettingsError> {
        let normalized_settings = settings.normalized();
        self.persist(&normalized_settings)?;
        self.settings.store(Arc::new(normalized_settings));
        Ok(())
    }

    fn load_from_disk(path: &Path) -> WorkbenchSettings {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
            return WorkbenchSettings::default();
        }

        let figment = Figment::from(Serialized::defaults(WorkbenchSettings::default()))
            .merge(Json::file(path));

        match figment.extract::<WorkbenchSettings>() {
            Ok(settings) => settings.normalized(),
            Err(error) => {
                tracing::warn!(
                    "failed to parse settings from {:?}: {}. using defaults",
                    path,
                    error
                );
                WorkbenchSettings::default()
            }
        }
    }

    fn persist(&self, settings: &WorkbenchSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).context(CreateDirSnafu {
                stage: "create-settings-directory",
                path: parent.to_path_buf(),
            })?;
        }

        let content = serde_json::to_string_pretty(settings).context(SerializeConfigSnafu {
            stage: "serialize-settings-json",
        })?;

        let temp_path = self.config_path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).context(WriteFileSnafu {
            stage: "write-temporary-settings-file",
            path: temp_path.clone(),
        })?;

        std::fs::rename(&temp_path, &self.config_path).context(RenameTempFileSnafu {
            stage: "rename-temporary-settings-file",
            from: temp_path,
            to: self.config_path.clone(),
        })?;

        tracing::info!("saved settings to {:?}", self.config_path);
        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to create settings directory at {path:?} on `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to serialize settings on `{stage}`: {source}"))]
    SerializeConfig {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to write settings file at {path:?} on `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "failed to replace settings file from {from:?} to {to:?} on `{stage}`: {source}"
    ))]
    RenameTempFile {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

fn default_model_id() -> String {
    AVAILABLE_MODELS[0].id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::unix_now_millis;

    fn scratch_path(label: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!(
                "skillbench-settings-{label}-{}-{}",
                std::process::id(),
                unix_now_millis()
            ))
            .join(SETTINGS_FILE_NAME)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = SettingsStore::new(scratch_path("missing"));
        assert_eq!(*store.settings(), WorkbenchSettings::default());
        assert_eq!(store.settings().model().label, "Claude Sonnet 4.5");
    }

    #[test]
    fn update_persists_and_reloads() {
        let path = scratch_path("roundtrip");
        let store = SettingsStore::new(path.clone());

        store
            .update(WorkbenchSettings {
                theme_mode: ThemeModeSetting::Dark,
                theme_name: "  Ayu Dark ".to_string(),
                model_id: "claude-opus-4".to_string(),
            })
            .expect("settings write");

        let reloaded = SettingsStore::new(path.clone());
        let settings = reloaded.settings();
        assert_eq!(settings.theme_mode, ThemeModeSetting::Dark);
        assert_eq!(settings.theme_name, "Ayu Dark");
        assert_eq!(settings.model_id, "claude-opus-4");

        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn partial_or_unknown_values_fall_back() {
        let path = scratch_path("partial");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("scratch dir");
        }
        std::fs::write(&path, r#"{ "theme_mode": "dark", "model_id": "gpt-unknown" }"#)
            .expect("fixture write");

        let settings = SettingsStore::new(path.clone()).settings();
        assert_eq!(settings.theme_mode, ThemeModeSetting::Dark);
        assert_eq!(settings.model_id, AVAILABLE_MODELS[0].id);

        std::fs::write(&path, "not json").expect("fixture write");
        assert_eq!(
            *SettingsStore::new(path.clone()).settings(),
            WorkbenchSettings::default()
        );

        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }
}
