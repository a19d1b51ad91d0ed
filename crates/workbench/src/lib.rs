#![deny(unsafe_code)]

//! Session, selection and composer state for the skill workbench.
//!
//! Nothing here touches the UI toolkit; the desktop shell reads these types and
//! forwards user intents to [`Workbench`].

pub mod auth;
pub mod catalog;
pub mod composer;
pub mod error;
pub mod files;
pub mod ids;
pub mod selection;
pub mod session;
pub mod settings;
pub mod store;
pub mod workbench;

pub use auth::{AuthSession, submit_login_form, validate_login_form};
pub use catalog::{Skill, SkillCatalog, SkillPack};
pub use composer::Composer;
pub use error::{WorkbenchError, WorkbenchResult};
pub use files::{DownloadPayload, EntryKind, FileBrowser, FileEditor, FileEntry, OpenedFile};
pub use ids::{MessageId, SessionId};
pub use selection::{DraftChange, SelectionState};
pub use session::{ASSISTANT_ACK_TEXT, DEFAULT_SESSION_TITLE, Message, Role, Session};
pub use settings::{
    AVAILABLE_MODELS, ModelOption, SettingsError, SettingsStore, ThemeModeSetting,
    WorkbenchSettings,
};
pub use store::SessionStore;
pub use workbench::{SendOutcome, Workbench};
