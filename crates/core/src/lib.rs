//! Core types for bpedit.
//!
//! This crate provides the entity model the editors operate on, the
//! static game data catalog, the error taxonomy and the change event
//! primitive shared by widgets and editors.

pub mod catalog;
pub mod entity;
pub mod error;
pub mod event;

pub use entity::{Entity, EntityKind, ModuleSlots, Position, RecipeSlot, SliceKind};
pub use error::{BindingError, EditError, EditorError};
pub use event::{Changed, Emitter, SubscriptionId};
