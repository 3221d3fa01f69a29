use std::io;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{poll, read, Event};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;
use crate::handlers::keyboard::handle_key_event;
use crate::handlers::mouse::handle_mouse_event;
use crate::ui::draw_ui;

/// How long to wait for input before checking background work again
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Apply finished stats fetches and expire notices
        app.poll_background(Utc::now());

        if app.should_quit {
            return Ok(());
        }

        terminal.draw(|f| draw_ui(f, app))?;

        // Resizes are picked up by the next draw
        if poll(POLL_INTERVAL)? {
            match read()? {
                Event::Key(key) => handle_key_event(app, key),
                Event::Mouse(mouse) => handle_mouse_event(app, mouse),
                _ => {}
            }
        }
    }
}
