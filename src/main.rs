mod app;
mod demo;
mod event;
mod preview;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use bpedit_config::Config;
use bpedit_logger::LogLevel;
use bpedit_theme::set_themes_dir;

use app::App;

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    if let Ok(themes_dir) = Config::get_themes_dir() {
        set_themes_dir(themes_dir);
    }

    let min_level = config
        .logging
        .min_level
        .parse()
        .unwrap_or(LogLevel::Info);
    bpedit_logger::init(
        config.log_file_path(),
        config.logging.max_entries,
        min_level,
    );
    bpedit_logger::info("bpedit started");

    let entities = demo::blueprint()?;
    let mut app = App::new(&config, entities);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        bpedit_logger::error(format!("{:#}", err));
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
