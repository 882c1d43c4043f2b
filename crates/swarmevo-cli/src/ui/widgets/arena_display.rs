use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    text::Line,
    widgets::{Block, Widget},
};
use swarmevo_sim::{Scenario, Vec2};

/// Renders a scenario's arena as a bordered map of bots.
///
/// World coordinates are scaled to the inner cell grid; bots render as
/// dots colored by motion and the pursuit target, when the scenario has
/// one, as a cross.
#[derive(Clone, Copy)]
pub struct ArenaDisplay<'a> {
    scenario: &'a dyn Scenario,
    title: &'a str,
}

impl<'a> ArenaDisplay<'a> {
    pub fn new(scenario: &'a dyn Scenario, title: &'a str) -> Self {
        Self { scenario, title }
    }

    /// Maps a world position to a buffer cell inside `inner`.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn to_cell(self, inner: Rect, position: Vec2) -> (u16, u16) {
        let bounds = self.scenario.bounds();
        let col = (position.x / bounds.width * f32::from(inner.width)) as u16;
        let row = (position.y / bounds.height * f32::from(inner.height)) as u16;
        (
            inner.x + col.min(inner.width - 1),
            inner.y + row.min(inner.height - 1),
        )
    }
}

impl Widget for ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(Line::from(self.title).centered());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if let Some(target) = self.scenario.target() {
            let (x, y) = self.to_cell(inner, target);
            buf[(x, y)].set_char('✕').set_fg(Color::Yellow);
        }

        for bot in self.scenario.bots() {
            let (x, y) = self.to_cell(inner, bot.position());
            let moving = bot.velocity().length() > 0.05;
            let color = if moving { Color::Cyan } else { Color::DarkGray };
            buf[(x, y)].set_char('●').set_fg(color);
        }
    }
}
