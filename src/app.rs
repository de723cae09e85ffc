//! Host application: entity list, preview pane and the open editor.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
    Terminal,
};

use bpedit_config::Config;
use bpedit_core::{EditError, EditorError, Entity};
use bpedit_editor::{EditorResponse, EditorSessions, Preview, Scale};
use bpedit_theme::Theme;

use crate::event::{Event, EventHandler};
use crate::preview::TerminalPreview;

/// Width of the entity list column
const LIST_WIDTH: u16 = 34;

pub struct App {
    theme: &'static Theme,
    scale: Scale,
    tick_rate: Duration,
    entities: Vec<Rc<RefCell<Entity>>>,
    selected: usize,
    sessions: EditorSessions,
    /// Entity whose editor receives input
    active: Option<u32>,
    preview: Rc<TerminalPreview>,
    /// Last error, shown in the status line until the next action
    error: Option<String>,
    list_area: Rect,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, entities: Vec<Rc<RefCell<Entity>>>) -> Self {
        Self {
            theme: Theme::get_by_name(&config.general.theme),
            scale: Scale::new(config.layout.px_per_col, config.layout.px_per_row),
            tick_rate: Duration::from_millis(config.general.tick_rate_ms),
            entities,
            selected: 0,
            sessions: EditorSessions::new(),
            active: None,
            preview: Rc::new(TerminalPreview::new()),
            error: None,
            list_area: Rect::default(),
            should_quit: false,
        }
    }

    /// Main loop. Draws only when input arrived or the preview was marked dirty.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let events = EventHandler::new(self.tick_rate);
        let mut needs_redraw = true;

        while !self.should_quit {
            let dirty = self.preview.take_dirty();
            if needs_redraw || dirty {
                terminal.draw(|frame| {
                    let area = frame.area();
                    self.draw(area, frame.buffer_mut());
                })?;
                needs_redraw = false;
            }

            match events.next()? {
                Event::Key(key) => {
                    self.handle_key(key);
                    needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    self.handle_mouse(mouse);
                    needs_redraw = true;
                }
                Event::Resize(..) => needs_redraw = true,
                Event::Tick => {}
            }
        }

        self.sessions.close_all();
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let Some(number) = self.active {
            self.error = None;
            let response = match self.sessions.get_mut(number) {
                Some(editor) => editor.handle_key(key),
                None => {
                    self.active = None;
                    return;
                }
            };
            self.apply(number, response);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected + 1),
            KeyCode::Home => self.select(0),
            KeyCode::End => self.select(usize::MAX),
            KeyCode::Enter => self.open_selected(),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let Some(number) = self.active {
            let response = match self.sessions.get_mut(number) {
                Some(editor) => editor.handle_mouse(mouse),
                None => return,
            };
            self.apply(number, response);
            return;
        }

        match mouse.kind {
            MouseEventKind::ScrollUp => self.select(self.selected.saturating_sub(1)),
            MouseEventKind::ScrollDown => self.select(self.selected + 1),
            MouseEventKind::Down(MouseButton::Left) => {
                let inner = self.list_area.inner(Margin::new(1, 1));
                if mouse.column >= inner.x
                    && mouse.column < inner.x + inner.width
                    && mouse.row >= inner.y
                    && mouse.row < inner.y + inner.height
                {
                    let index = (mouse.row - inner.y) as usize;
                    if index < self.entities.len() {
                        self.select(index);
                    }
                }
            }
            _ => {}
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.entities.len().saturating_sub(1));
        self.error = None;
    }

    fn open_selected(&mut self) {
        let Some(entity) = self.entities.get(self.selected).cloned() else {
            return;
        };
        let number = entity.borrow().number;
        let preview: Rc<dyn Preview> = self.preview.clone();

        match self.sessions.open(entity, preview) {
            Ok(_) | Err(EditorError::AlreadyOpen(_)) => {
                self.active = Some(number);
                self.error = None;
            }
            Err(err) => {
                bpedit_logger::warn(err.to_string());
                self.error = Some(err.to_string());
            }
        }
    }

    fn apply(&mut self, number: u32, response: Result<EditorResponse, EditError>) {
        match response {
            Ok(EditorResponse::CloseRequested) => {
                self.sessions.close(number);
                self.active = None;
            }
            Ok(_) => {}
            Err(err) => {
                bpedit_logger::warn(format!("entity #{}: {}", number, err));
                self.error = Some(err.to_string());
            }
        }
    }

    /// Draw the whole screen.
    pub fn draw(&mut self, area: Rect, buf: &mut Buffer) {
        let [main, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let [list, pane] =
            Layout::horizontal([Constraint::Length(LIST_WIDTH), Constraint::Min(1)]).areas(main);

        self.list_area = list;
        self.draw_list(list, buf);

        let shown = self
            .active
            .and_then(|number| self.entities.iter().find(|e| e.borrow().number == number))
            .or_else(|| self.entities.get(self.selected));
        if let Some(entity) = shown {
            self.preview.render(&entity.borrow(), pane, buf, self.theme);
        }

        if let Some(editor) = self.active.and_then(|number| self.sessions.get_mut(number)) {
            editor.render(main, buf, self.theme, self.scale, true);
        }

        self.draw_status(status, buf);
    }

    fn draw_list(&self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let block = Block::default()
            .title(" Blueprint ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if self.active.is_some() {
                theme.disabled
            } else {
                theme.accented_fg
            }))
            .style(Style::default().bg(theme.bg).fg(theme.fg));
        let inner = block.inner(area);
        block.render(area, buf);

        for (index, entity) in self.entities.iter().take(inner.height as usize).enumerate() {
            let entity = entity.borrow();
            let marker = if self.sessions.is_open(entity.number) {
                '*'
            } else {
                ' '
            };
            let text = format!("{}#{:<3}{}", marker, entity.number, entity.title());
            let style = if index == self.selected {
                Style::default().bg(theme.selected_bg).fg(theme.selected_fg)
            } else {
                Style::default().fg(theme.fg)
            };
            let y = inner.y + index as u16;
            buf.set_style(Rect::new(inner.x, y, inner.width, 1), style);
            buf.set_stringn(inner.x, y, text, inner.width as usize, style);
        }
    }

    fn draw_status(&self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let base = Style::default().bg(theme.accented_bg).fg(theme.fg);
        buf.set_style(area, base);

        let (text, style) = match &self.error {
            Some(error) => (error.clone(), base.fg(theme.error).add_modifier(Modifier::BOLD)),
            None => {
                let hints = if self.active.is_some() {
                    "Tab: next widget  Esc: close"
                } else {
                    "Enter: edit  q: quit"
                };
                let text = match bpedit_logger::get_entries().last() {
                    Some(entry) => format!(
                        "{}  | {} {}",
                        hints,
                        entry.level.to_str(),
                        entry.message
                    ),
                    None => hints.to_string(),
                };
                (text, base)
            }
        };
        buf.set_stringn(area.x + 1, area.y, text, area.width.saturating_sub(1) as usize, style);
    }
}
