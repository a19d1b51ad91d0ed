/// Event contracts between the chat views.
pub mod events;
pub mod message_input;
pub mod message_list;
pub mod scroll_manager;
pub mod sidebar;
pub mod skill_picker;
pub mod view;

pub use events::{
    AttachImageClicked, DraftEdited, NewSessionClicked, PackClicked, SessionSelected, SkillClicked,
    Submit,
};
pub use message_input::MessageInput;
pub use message_list::MessageList;
pub use scroll_manager::ScrollManager;
pub use sidebar::{ChatSidebar, SessionRow};
pub use skill_picker::SkillPicker;
pub use view::ChatView;
