//! Recipe picker.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

use bpedit_core::catalog::{self, RECIPES};
use bpedit_core::{BindingError, EditError, Entity, SliceKind};
use bpedit_theme::Theme;

use crate::{contains, Bind, Binding, Widget};

/// Width of the picker in cells, brackets included.
const PICKER_WIDTH: u16 = 24;

/// Single-choice picker over the recipe catalog.
#[derive(Debug)]
pub struct RecipeWidget {
    binding: Binding,
}

impl RecipeWidget {
    /// Currently selected recipe.
    pub fn recipe(&self) -> Option<String> {
        self.binding
            .entity()
            .recipe()
            .and_then(|slot| slot.recipe.clone())
    }

    /// Select a recipe, or clear the selection with `None`.
    pub fn set(&self, recipe: Option<&str>) -> Result<(), EditError> {
        if let Some(name) = recipe {
            if !catalog::is_recipe(name) {
                return Err(EditError::UnknownRecipe(name.into()));
            }
        }

        self.binding.edit(|e| {
            let slot = e.recipe_mut().ok_or(EditError::Detached)?;
            if slot.recipe.as_deref() == recipe {
                return Ok(false);
            }
            slot.recipe = recipe.map(String::from);
            Ok(true)
        })?;
        Ok(())
    }

    /// Step through `[none, recipes...]`.
    pub fn cycle(&self, forward: bool) -> Result<(), EditError> {
        let states = RECIPES.len() + 1;
        let from = self
            .recipe()
            .and_then(|r| RECIPES.iter().position(|name| *name == r))
            .map(|i| i + 1)
            .unwrap_or(0);
        let to = if forward {
            (from + 1) % states
        } else {
            (from + states - 1) % states
        };

        self.set(to.checked_sub(1).map(|i| RECIPES[i]))
    }
}

impl Bind for RecipeWidget {
    fn bind(entity: Rc<RefCell<Entity>>) -> Result<Self, BindingError> {
        Ok(Self {
            binding: Binding::new(entity, SliceKind::Recipe)?,
        })
    }
}

impl Widget for RecipeWidget {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn size(&self) -> (u16, u16) {
        (PICKER_WIDTH, 1)
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        let inner = PICKER_WIDTH.min(area.width).saturating_sub(2) as usize;
        let (text, mut style) = match self.recipe() {
            Some(recipe) => (recipe, Style::default().fg(theme.fg)),
            None => ("<none>".to_string(), Style::default().fg(theme.disabled)),
        };
        if focused {
            style = Style::default()
                .fg(theme.selected_fg)
                .bg(theme.selected_bg)
                .add_modifier(Modifier::BOLD);
        }

        let text = if text.width() > inner {
            text.chars().take(inner).collect()
        } else {
            text
        };
        buf.set_string(area.x, area.y, format!("[{:<inner$}]", text), style);
    }

    fn handle_key(&self, key: KeyEvent) -> Result<bool, EditError> {
        match key.code {
            KeyCode::Up | KeyCode::Enter | KeyCode::Char(' ') => {
                self.cycle(true)?;
                Ok(true)
            }
            KeyCode::Down => {
                self.cycle(false)?;
                Ok(true)
            }
            KeyCode::Delete | KeyCode::Backspace => {
                self.set(None)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn handle_mouse(&self, mouse: MouseEvent, area: Rect) -> Result<bool, EditError> {
        if !contains(area, mouse.column, mouse.row) {
            return Ok(false);
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::ScrollUp => {
                self.cycle(true)?;
                Ok(true)
            }
            MouseEventKind::ScrollDown => {
                self.cycle(false)?;
                Ok(true)
            }
            MouseEventKind::Down(MouseButton::Right) => {
                self.set(None)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
