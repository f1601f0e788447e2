//! Application controller.
//!
//! This module orchestrates the main application loop:
//! - Terminal initialization and cleanup
//! - Event polling and handling
//! - State updates and rendering

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use crate::event::{apply_action, handle_event, poll_event, Action};
use crate::model::AppState;
use crate::ui::{calculate_visible_dimensions, render};

/// The main application controller.
pub struct App {
    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state
    state: AppState,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Creates a new application with the given state.
    pub fn new(state: AppState) -> Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Runs the main application loop.
    pub fn run(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        resize_viewport(&mut self.state, size.width, size.height);
        info!(
            bases = self.state.sequence.len(),
            rows = self.state.layout.row_count(),
            "viewer started"
        );

        loop {
            self.terminal.draw(|frame| {
                render(frame, &self.state);
            })?;

            if let Some(event) = poll_event(self.tick_rate) {
                if !process_event(&mut self.state, event) {
                    break;
                }
            }
        }

        info!("viewer closed");
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Sizes the viewport from terminal dimensions.
fn resize_viewport(state: &mut AppState, width: u16, height: u16) {
    let (visible_lines, visible_cols) = calculate_visible_dimensions(width, height);
    state.update_viewport_size(visible_lines, visible_cols);
}

/// Applies one terminal event to the state.
///
/// Returns `false` once the application should quit.
pub fn process_event(state: &mut AppState, event: Event) -> bool {
    let action = handle_event(event, &state.mode, state.show_help);
    if action != Action::None {
        debug!(?action, "key action");
    }

    // Resize carries the new terminal size, the viewport follows it
    if let Action::Resize(width, height) = action {
        resize_viewport(state, width, height);
    }

    apply_action(state, action)
}

/// Convenience function to run the viewer on a prepared state.
pub fn run_app(state: AppState) -> Result<()> {
    let mut app = App::new(state)?;
    app.run()
}
