//! Entity editors for bpedit.
//!
//! An [`Editor`] is a fixed-size panel for one entity kind. Which labels and
//! widgets it shows is described by an [`EditorLayout`]; adding support for a
//! new entity kind means adding a layout, not a new editor type.
//!
//! Every mounted widget's "changed" event is wired to the [`Preview`] so the
//! rendered entity stays in sync with edits.

pub mod editor;
pub mod layout;
pub mod preview;
pub mod sessions;

pub use editor::{Editor, EditorResponse, EditorState, Label, Mount};
pub use layout::{EditorLayout, LayoutItem, Scale, ASSEMBLING_MACHINE, BEACON, LAYOUTS, MINING_DRILL};
pub use preview::Preview;
pub use sessions::EditorSessions;
