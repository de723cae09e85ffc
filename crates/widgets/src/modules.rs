//! Module slot grid.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};

use bpedit_core::catalog::{self, Module};
use bpedit_core::{BindingError, EditError, Entity, EntityKind, ModuleSlots, SliceKind};
use bpedit_theme::Theme;

use crate::{contains, Bind, Binding, Widget};

/// Width of one slot cell: "[S1]"
const SLOT_WIDTH: u16 = 4;

/// Editable grid of module slots.
///
/// Slots are compact: inserting always fills the first free slot and
/// removing shifts the following modules left.
#[derive(Debug)]
pub struct ModulesWidget {
    binding: Binding,
    /// Slot under the keyboard cursor
    cursor: Cell<usize>,
    /// Slot under the mouse pointer
    hover: Cell<Option<usize>>,
}

impl ModulesWidget {
    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.binding
            .entity()
            .modules()
            .map(ModuleSlots::capacity)
            .unwrap_or(0)
    }

    /// Installed modules, in slot order.
    pub fn modules(&self) -> Vec<String> {
        self.binding
            .entity()
            .modules()
            .map(|slots| slots.iter().map(String::from).collect())
            .unwrap_or_default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    /// Move the cursor. Transient UI state, no change event.
    pub fn select(&self, index: usize) {
        self.cursor
            .set(index.min(self.capacity().saturating_sub(1)));
    }

    /// Insert a module into the first free slot.
    pub fn insert(&self, module: &str) -> Result<(), EditError> {
        let module = self.validate(module)?;
        self.binding.edit(|e| {
            let slots = slots_mut(e)?;
            if slots.is_full() {
                return Err(EditError::SlotsFull {
                    capacity: slots.capacity(),
                });
            }
            slots.modules_mut().push(module.name.to_string());
            Ok(true)
        })?;
        Ok(())
    }

    /// Replace the module in an occupied slot.
    pub fn replace(&self, index: usize, module: &str) -> Result<(), EditError> {
        let module = self.validate(module)?;
        self.binding.edit(|e| {
            let slots = slots_mut(e)?;
            let len = slots.len();
            let current = slots
                .modules_mut()
                .get_mut(index)
                .ok_or(EditError::SlotOutOfRange { index, len })?;
            if current.as_str() == module.name {
                return Ok(false);
            }
            *current = module.name.to_string();
            Ok(true)
        })?;
        Ok(())
    }

    /// Remove the module in an occupied slot, returning it.
    pub fn remove(&self, index: usize) -> Result<String, EditError> {
        let mut removed = String::new();
        self.binding.edit(|e| {
            let slots = slots_mut(e)?;
            let len = slots.len();
            if index >= len {
                return Err(EditError::SlotOutOfRange { index, len });
            }
            removed = slots.modules_mut().remove(index);
            Ok(true)
        })?;
        Ok(removed)
    }

    /// Remove all modules.
    pub fn clear(&self) -> Result<(), EditError> {
        self.binding.edit(|e| {
            let slots = slots_mut(e)?;
            if slots.is_empty() {
                return Ok(false);
            }
            slots.modules_mut().clear();
            Ok(true)
        })?;
        Ok(())
    }

    /// Step the slot under the cursor through `[empty, allowed modules...]`.
    ///
    /// Stepping past the last module empties the slot; stepping an empty
    /// slot inserts into the first free slot and moves the cursor there.
    pub fn cycle(&self, forward: bool) -> Result<(), EditError> {
        let allowed: Vec<&'static Module> = catalog::modules_for(self.binding.kind()).collect();
        let cursor = self.cursor.get();
        let mut new_cursor = cursor;

        self.binding.edit(|e| {
            let slots = slots_mut(e)?;
            let current = slots
                .get(cursor)
                .and_then(|name| allowed.iter().position(|m| m.name == name));

            // Position 0 is "empty", module i sits at i + 1
            let states = allowed.len() + 1;
            let from = if cursor < slots.len() {
                current.map(|i| i + 1).unwrap_or(0)
            } else {
                0
            };
            let to = if forward {
                (from + 1) % states
            } else {
                (from + states - 1) % states
            };

            match (cursor < slots.len(), to) {
                (true, 0) => {
                    slots.modules_mut().remove(cursor);
                }
                (true, i) => slots.modules_mut()[cursor] = allowed[i - 1].name.to_string(),
                (false, 0) => return Ok(false),
                (false, i) => {
                    if slots.is_full() {
                        return Err(EditError::SlotsFull {
                            capacity: slots.capacity(),
                        });
                    }
                    slots.modules_mut().push(allowed[i - 1].name.to_string());
                    new_cursor = slots.len() - 1;
                }
            }
            Ok(true)
        })?;

        self.cursor.set(new_cursor);
        Ok(())
    }

    fn validate(&self, name: &str) -> Result<&'static Module, EditError> {
        let module = catalog::module(name).ok_or_else(|| EditError::UnknownModule(name.into()))?;
        let kind: EntityKind = self.binding.kind();
        if !catalog::module_allowed(module, kind) {
            return Err(EditError::NotAllowed {
                module: name.into(),
                kind,
            });
        }
        Ok(module)
    }

    fn slot_at(&self, area: Rect, column: u16) -> Option<usize> {
        let index = ((column - area.x) / SLOT_WIDTH) as usize;
        (index < self.capacity()).then_some(index)
    }

    fn remove_at_cursor(&self) -> Result<(), EditError> {
        let cursor = self.cursor.get();
        if cursor < self.modules().len() {
            self.remove(cursor)?;
        }
        Ok(())
    }
}

fn slots_mut(entity: &mut Entity) -> Result<&mut ModuleSlots, EditError> {
    // Bound widgets always find their slice; entities never drop slices.
    entity.modules_mut().ok_or(EditError::Detached)
}

impl Bind for ModulesWidget {
    fn bind(entity: Rc<RefCell<Entity>>) -> Result<Self, BindingError> {
        Ok(Self {
            binding: Binding::new(entity, SliceKind::Modules)?,
            cursor: Cell::new(0),
            hover: Cell::new(None),
        })
    }
}

impl Widget for ModulesWidget {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn size(&self) -> (u16, u16) {
        (self.capacity() as u16 * SLOT_WIDTH, 1)
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        let modules = self.modules();

        for slot in 0..self.capacity() {
            let x = area.x + slot as u16 * SLOT_WIDTH;
            if x + SLOT_WIDTH > area.x + area.width {
                break;
            }

            let module = modules.get(slot).and_then(|name| catalog::module(name));
            let label = module.map(|m| m.short).unwrap_or("  ");

            let mut style = match module {
                Some(m) if m.productivity => Style::default().fg(theme.warning),
                Some(_) => Style::default().fg(theme.success),
                None => Style::default().fg(theme.disabled),
            };
            if focused && slot == self.cursor.get() {
                style = Style::default()
                    .fg(theme.selected_fg)
                    .bg(theme.selected_bg)
                    .add_modifier(Modifier::BOLD);
            }
            if self.hover.get() == Some(slot) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }

            buf.set_string(x, area.y, format!("[{}]", label), style);
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Result<bool, EditError> {
        match key.code {
            KeyCode::Left => {
                self.select(self.cursor().saturating_sub(1));
                Ok(true)
            }
            KeyCode::Right => {
                self.select(self.cursor() + 1);
                Ok(true)
            }
            KeyCode::Up | KeyCode::Enter | KeyCode::Char(' ') => {
                self.cycle(true)?;
                Ok(true)
            }
            KeyCode::Down => {
                self.cycle(false)?;
                Ok(true)
            }
            KeyCode::Delete | KeyCode::Backspace => {
                self.remove_at_cursor()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn handle_mouse(&self, mouse: MouseEvent, area: Rect) -> Result<bool, EditError> {
        if !contains(area, mouse.column, mouse.row) {
            self.hover.set(None);
            return Ok(false);
        }
        let Some(slot) = self.slot_at(area, mouse.column) else {
            self.hover.set(None);
            return Ok(false);
        };

        match mouse.kind {
            MouseEventKind::Moved => {
                self.hover.set(Some(slot));
                Ok(true)
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.select(slot);
                self.cycle(true)?;
                Ok(true)
            }
            MouseEventKind::Down(MouseButton::Right) => {
                self.select(slot);
                self.remove_at_cursor()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
