//! Preview pane driven by editor change events.

use std::cell::Cell;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use bpedit_core::Entity;
use bpedit_editor::Preview;
use bpedit_theme::Theme;

/// Terminal preview surface.
///
/// `redraw` only marks the frame dirty; the run loop picks it up and draws
/// the next frame from the entity's current state.
#[derive(Debug, Default)]
pub struct TerminalPreview {
    dirty: Cell<bool>,
    generation: Cell<u64>,
}

impl TerminalPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of redraw requests received so far.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Clear the dirty flag, returning its previous value.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    /// Render the entity summary into `area`.
    pub fn render(&self, entity: &Entity, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .title(" Preview ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.disabled))
            .style(Style::default().bg(theme.bg).fg(theme.fg));

        Paragraph::new(summary(entity, theme, self.generation()))
            .block(block)
            .render(area, buf);
    }
}

impl Preview for TerminalPreview {
    fn redraw(&self) {
        self.dirty.set(true);
        self.generation.set(self.generation.get() + 1);
    }
}

fn summary(entity: &Entity, theme: &Theme, generation: u64) -> Vec<Line<'static>> {
    let dim = Style::default().fg(theme.disabled);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} #{}", entity.title(), entity.number),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("name: ", dim),
            Span::raw(entity.name.clone()),
        ]),
        Line::from(vec![
            Span::styled("type: ", dim),
            Span::raw(entity.kind.to_str()),
        ]),
        Line::from(vec![
            Span::styled("position: ", dim),
            Span::raw(format!("({}, {})", entity.position.x, entity.position.y)),
        ]),
    ];

    if let Some(recipe) = entity.recipe() {
        let value = match &recipe.recipe {
            Some(name) => Span::raw(name.clone()),
            None => Span::styled("<none>", dim),
        };
        lines.push(Line::from(vec![Span::styled("recipe: ", dim), value]));
    }

    if let Some(slots) = entity.modules() {
        lines.push(Line::from(vec![
            Span::styled("modules: ", dim),
            Span::raw(format!("{}/{}", slots.len(), slots.capacity())),
        ]));
        for (index, module) in slots.iter().enumerate() {
            lines.push(Line::from(format!("  {}. {}", index + 1, module)));
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("redraws: {}", generation),
        Style::default().fg(theme.success),
    )));
    lines
}
