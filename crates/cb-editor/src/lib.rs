pub mod commands;
pub mod config;
pub mod input;
pub mod mutation;
pub mod popup;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use commands::CommandStack;
pub use config::EditorConfig;
pub use input::{InputEvent, Modifiers};
pub use mutation::Mutation;
pub use popup::{ListenerChange, PopupAnchor, PopupState};
pub use selection::Selection;
pub use session::{Editor, RenderSnapshot, SaveSink};
pub use shortcuts::{SHORTCUT_LEGEND, ShortcutAction, ShortcutMap};
pub use tools::{DragSubject, ToolboxItem};
