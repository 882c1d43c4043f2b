use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications driven by [`Tui::run`].
pub trait App {
    /// Called once before the event loop starts; configure the tick rate
    /// here.
    fn init(&mut self, tui: &mut Tui);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Draws the screen; called whenever state changed.
    fn draw(&self, frame: &mut Frame);

    /// Advances application logic; called once per tick.
    fn update(&mut self, tui: &mut Tui);
}
