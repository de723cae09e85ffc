//! Shared widget handle returned by editor factories.

use std::any::Any;
use std::ops::Deref;
use std::rc::Rc;

use bpedit_core::{Changed, SubscriptionId};

use crate::Widget;

/// Handle to a mounted widget.
///
/// The owning editor keeps one clone; callers may keep others to subscribe
/// or drive the widget directly. Once the editor closes, the widget behind
/// every clone is detached. Listeners may use any clone, including one
/// captured by the listener itself.
pub struct WidgetHandle<W> {
    inner: Rc<W>,
}

impl<W: Widget + 'static> WidgetHandle<W> {
    pub fn new(widget: W) -> Self {
        Self {
            inner: Rc::new(widget),
        }
    }

    /// Subscribe to the widget's "changed" event.
    pub fn on_changed(&self, listener: impl FnMut(&Changed) + 'static) -> SubscriptionId {
        self.inner.binding().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    /// Type-erased clone for heterogeneous widget lists.
    pub fn erase(&self) -> Rc<dyn Widget> {
        self.inner.clone()
    }

    /// Clone usable with [`WidgetHandle::downcast`].
    pub fn to_any(&self) -> Rc<dyn Any> {
        self.inner.clone()
    }

    /// Recover a typed handle from [`WidgetHandle::to_any`].
    pub fn downcast(any: Rc<dyn Any>) -> Option<Self> {
        any.downcast::<W>().ok().map(|inner| Self { inner })
    }
}

impl<W> Deref for WidgetHandle<W> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.inner
    }
}

impl<W> Clone for WidgetHandle<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use bpedit_core::{EditError, Entity, EntityKind};

    use crate::{Bind, ModulesWidget, RecipeWidget};

    fn beacon() -> Rc<RefCell<Entity>> {
        Rc::new(RefCell::new(
            Entity::new(4, "beacon", EntityKind::Beacon).with_modules(2),
        ))
    }

    #[test]
    fn test_clones_share_widget() {
        let handle = WidgetHandle::new(ModulesWidget::bind(beacon()).unwrap());
        let other = handle.clone();

        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        handle.on_changed(move |_| h.set(h.get() + 1));

        other.insert("speed-module").unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(handle.modules(), vec!["speed-module".to_string()]);

        let any = handle.to_any();
        assert!(WidgetHandle::<RecipeWidget>::downcast(any.clone()).is_none());
        let typed = WidgetHandle::<ModulesWidget>::downcast(any).unwrap();
        assert_eq!(typed.modules().len(), 1);

        handle.erase().detach();
        assert!(other.is_detached());
    }

    #[test]
    fn test_listener_uses_own_handle() {
        let handle = WidgetHandle::new(ModulesWidget::bind(beacon()).unwrap());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let own = Rc::new(Cell::new(None));
        let (h, s, id) = (handle.clone(), seen.clone(), own.clone());
        own.set(Some(handle.on_changed(move |_| {
            s.borrow_mut().push(h.modules());
            if let Some(id) = id.get() {
                h.unsubscribe(id);
            }
        })));

        handle.insert("speed-module").unwrap();
        handle.insert("speed-module-2").unwrap();
        assert_eq!(*seen.borrow(), vec![vec!["speed-module".to_string()]]);
        assert_eq!(handle.modules().len(), 2);

        handle.detach();
        assert_eq!(handle.insert("speed-module"), Err(EditError::Detached));
    }
}
