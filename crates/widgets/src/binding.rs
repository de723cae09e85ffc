//! Entity slice binding shared by all widgets.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use bpedit_core::{
    BindingError, Changed, EditError, Emitter, Entity, EntityKind, SliceKind, SubscriptionId,
};

/// Reference to one slice of one entity plus the "changed" emitter.
///
/// Every mutation goes through [`Binding::edit`], which emits exactly one
/// `Changed` per effective mutation and none for failed or no-op edits.
/// All methods take `&self`: listeners may read the widget, unsubscribe,
/// or detach it while the event is being delivered.
#[derive(Debug)]
pub struct Binding {
    entity: Rc<RefCell<Entity>>,
    number: u32,
    kind: EntityKind,
    slice: SliceKind,
    changed: Emitter<Changed>,
    detached: Cell<bool>,
}

impl Binding {
    /// Bind to `slice` of `entity`.
    pub fn new(entity: Rc<RefCell<Entity>>, slice: SliceKind) -> Result<Self, BindingError> {
        let (number, kind) = {
            let e = entity.borrow();
            if !e.has_slice(slice) {
                return Err(BindingError {
                    entity: e.number,
                    name: e.name.clone(),
                    slice,
                });
            }
            (e.number, e.kind)
        };

        Ok(Self {
            entity,
            number,
            kind,
            slice,
            changed: Emitter::new(),
            detached: Cell::new(false),
        })
    }

    pub fn slice(&self) -> SliceKind {
        self.slice
    }

    /// Kind of the bound entity.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Read access to the bound entity.
    pub fn entity(&self) -> Ref<'_, Entity> {
        self.entity.borrow()
    }

    /// Apply a mutation.
    ///
    /// `apply` returns whether it changed the slice. The entity borrow is
    /// released before listeners run, so they observe post-mutation state
    /// and may read the entity themselves.
    pub fn edit<F>(&self, apply: F) -> Result<bool, EditError>
    where
        F: FnOnce(&mut Entity) -> Result<bool, EditError>,
    {
        if self.detached.get() {
            return Err(EditError::Detached);
        }

        let changed = {
            let mut entity = self.entity.borrow_mut();
            apply(&mut entity)?
        };

        if changed {
            bpedit_logger::debug(format!(
                "entity #{} {} changed",
                self.number, self.slice
            ));
            self.changed.emit(&Changed {
                entity: self.number,
                slice: self.slice,
            });
        }
        Ok(changed)
    }

    pub fn subscribe(&self, listener: impl FnMut(&Changed) + 'static) -> SubscriptionId {
        self.changed.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.changed.unsubscribe(id)
    }

    /// Drop all listeners and refuse further edits.
    pub fn detach(&self) {
        if self.detached.replace(true) {
            return;
        }
        let dropped = self.changed.clear();
        bpedit_logger::debug(format!(
            "entity #{} {} widget detached ({} listeners)",
            self.number, self.slice, dropped
        ));
    }

    pub fn is_detached(&self) -> bool {
        self.detached.get()
    }

    pub fn listener_count(&self) -> usize {
        self.changed.listener_count()
    }
}
