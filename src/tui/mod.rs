//! Terminal user interface for the dashboard.
//!
//! [`TuiManager`] owns terminal setup and teardown (raw mode, alternate
//! screen) and the run loop. The loop is the single consumer of both input
//! events and dispatcher completions: every iteration draws a frame, then
//! waits for whichever arrives first. Keyboard input is read on a plain
//! thread because crossterm's blocking `read` must not sit on the async
//! runtime.

pub mod app;
pub mod render;
pub mod theme;

use anyhow::Result;
use app::DashboardApp;
use crossterm::event::{Event, KeyEventKind};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::store::Action;

pub struct TuiManager {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TuiManager {
    /// Initialize the terminal for full-screen rendering.
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Drive the dashboard until the user quits.
    pub async fn run(
        mut self,
        mut app: DashboardApp,
        mut actions: UnboundedReceiver<Action>,
    ) -> Result<()> {
        let mut input = spawn_input_reader();

        while !app.should_quit() {
            self.terminal.draw(|frame| render::render(frame, &app))?;

            tokio::select! {
                Some(event) = input.recv() => {
                    if let Event::Key(key) = event {
                        if key.kind == KeyEventKind::Press {
                            app.handle_key(key);
                        }
                    }
                }
                Some(action) = actions.recv() => {
                    app.apply(action);
                }
            }
        }

        Ok(())
    }
}

impl Drop for TuiManager {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Forwards blocking crossterm events into the async loop.
fn spawn_input_reader() -> UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(event) = crossterm::event::read() {
            if tx.send(event).is_err() {
                break;
            }
        }
    });
    rx
}
