//! Error types for editors and widgets
use thiserror::Error;

use crate::{EntityKind, SliceKind};

/// A widget was bound to a slice the entity does not carry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot bind {slice} widget: entity #{entity} ({name}) has no {slice} slice")]
pub struct BindingError {
    /// Entity number
    pub entity: u32,
    /// Entity prototype name
    pub name: String,
    /// Requested slice
    pub slice: SliceKind,
}

/// Editor construction and session errors.
///
/// None of these are retryable: they signal a contract violation by the
/// caller opening the editor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Widget binding failed
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// Editor variant opened on an entity of another kind
    #[error("{editor} editor expects a {expected} entity, got {actual}")]
    InvalidEntityType {
        editor: &'static str,
        expected: EntityKind,
        actual: EntityKind,
    },

    /// Layout has a zero dimension
    #[error("{editor} editor has invalid size {width}x{height}")]
    InvalidLayout {
        editor: &'static str,
        width: u16,
        height: u16,
    },

    /// An editor session is already open for the entity
    #[error("entity #{0} is already being edited")]
    AlreadyOpen(u32),

    /// No editor variant exists for the entity kind
    #[error("no editor available for {0}")]
    NoEditor(EntityKind),

    /// Prototype missing from the catalog
    #[error("unknown entity prototype: {0}")]
    UnknownPrototype(String),
}

/// Errors raised by widget edits.
///
/// A failed edit never modifies the entity and never emits a change event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Every module slot is occupied
    #[error("all {capacity} module slots are occupied")]
    SlotsFull { capacity: usize },

    /// Slot index past the end of the occupied slots
    #[error("module slot {index} is out of range (0..{len})")]
    SlotOutOfRange { index: usize, len: usize },

    /// Module missing from the catalog
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// Module not accepted by this entity kind
    #[error("{module} cannot be inserted into a {kind}")]
    NotAllowed { module: String, kind: EntityKind },

    /// Recipe missing from the catalog
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    /// Widget belongs to a closed editor
    #[error("widget is detached from a closed editor")]
    Detached,
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;
