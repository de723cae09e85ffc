//! Editing widgets for bpedit.
//!
//! A widget is bound to one slice of one entity at construction time and
//! notifies listeners through its "changed" event after every mutation.
//! There is no other way to observe a mutation: widgets push, nobody polls.
//!
//! ```text
//! user input → Widget → entity slice updated → Changed → listeners
//! ```

mod binding;
mod handle;
pub mod modules;
pub mod recipe;

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{buffer::Buffer, layout::Rect};

use bpedit_core::{BindingError, Changed, EditError, Entity, SliceKind, SubscriptionId};
use bpedit_theme::Theme;

pub use binding::Binding;
pub use handle::WidgetHandle;
pub use modules::ModulesWidget;
pub use recipe::RecipeWidget;

/// Listener for a widget's "changed" event.
pub type ChangeListener = Box<dyn FnMut(&Changed)>;

/// Trait for all editing widgets.
///
/// Every method takes `&self`; transient UI state lives in cells. A widget
/// can therefore be read, driven or detached from inside one of its own
/// "changed" listeners.
pub trait Widget {
    /// Binding to the entity slice this widget edits.
    fn binding(&self) -> &Binding;

    /// Size in terminal cells (width, height).
    fn size(&self) -> (u16, u16);

    /// Render the widget into `area`.
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool);

    /// Handle keyboard input.
    ///
    /// Returns Ok(true) if the key was consumed. Mutations triggered by the
    /// key have already emitted their change event when this returns.
    fn handle_key(&self, key: KeyEvent) -> Result<bool, EditError>;

    /// Handle mouse input.
    ///
    /// # Arguments
    /// * `mouse` - The mouse event (absolute terminal coordinates)
    /// * `area` - The area the widget was last rendered into
    fn handle_mouse(&self, mouse: MouseEvent, area: Rect) -> Result<bool, EditError> {
        let _ = (mouse, area);
        Ok(false)
    }

    /// Entity slice this widget is bound to.
    fn slice(&self) -> SliceKind {
        self.binding().slice()
    }

    /// Subscribe to the "changed" event.
    fn on_changed(&self, listener: ChangeListener) -> SubscriptionId {
        self.binding().subscribe(listener)
    }

    /// Remove a single listener.
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.binding().unsubscribe(id)
    }

    /// Drop every listener and refuse further edits.
    ///
    /// Called by the owning editor when it closes.
    fn detach(&self) {
        self.binding().detach();
    }

    /// Check if the widget was detached.
    fn is_detached(&self) -> bool {
        self.binding().is_detached()
    }
}

/// Widgets constructible from a shared entity reference.
pub trait Bind: Widget + Sized {
    /// Bind to the entity's slice. Fails without touching the entity
    /// when the slice does not exist.
    fn bind(entity: Rc<RefCell<Entity>>) -> Result<Self, BindingError>;
}

/// Check whether a terminal position lies within `area`.
pub(crate) fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
