//! Open editor sessions.
//!
//! Keeps at most one open editor per entity, so two editors never mutate
//! the same entity slice and previews cannot diverge.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use bpedit_core::{EditorError, Entity};

use crate::layout;
use crate::{Editor, Preview};

/// Registry of open editors keyed by entity number.
#[derive(Debug, Default)]
pub struct EditorSessions {
    open: BTreeMap<u32, Editor>,
}

impl EditorSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the editor matching the entity's kind.
    ///
    /// Fails with `AlreadyOpen` if the entity is being edited, `NoEditor` if
    /// no layout exists for its kind, or any error from [`Editor::open`].
    pub fn open(
        &mut self,
        entity: Rc<RefCell<Entity>>,
        preview: Rc<dyn Preview>,
    ) -> Result<&mut Editor, EditorError> {
        let (number, kind) = {
            let e = entity.borrow();
            (e.number, e.kind)
        };
        if self.open.contains_key(&number) {
            return Err(EditorError::AlreadyOpen(number));
        }
        let layout = layout::for_kind(kind).ok_or(EditorError::NoEditor(kind))?;

        let editor = Editor::open(layout, entity, preview)?;
        Ok(self.open.entry(number).or_insert(editor))
    }

    /// Close the editor for an entity. Returns false if none was open.
    pub fn close(&mut self, number: u32) -> bool {
        match self.open.remove(&number) {
            Some(mut editor) => {
                editor.close();
                true
            }
            None => false,
        }
    }

    /// Close every open editor.
    pub fn close_all(&mut self) {
        for (_, mut editor) in std::mem::take(&mut self.open) {
            editor.close();
        }
    }

    pub fn get_mut(&mut self, number: u32) -> Option<&mut Editor> {
        self.open.get_mut(&number)
    }

    pub fn is_open(&self, number: u32) -> bool {
        self.open.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
