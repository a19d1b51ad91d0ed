pub mod state;
pub mod view;

pub use state::{SettingsChanged, SettingsState, apply_theme};
pub use view::{SettingsClose, SettingsView};
