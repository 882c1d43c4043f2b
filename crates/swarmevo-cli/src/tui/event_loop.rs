use std::time::{Duration, Instant};

use crossterm::event::{self, Event};

/// Events delivered to the application loop.
#[derive(Debug)]
pub(super) enum TuiEvent {
    /// Advance application logic.
    Tick,
    /// Redraw the screen.
    Render,
    /// A terminal event arrived.
    Crossterm(Event),
}

/// Tick/render scheduling for the TUI loop.
///
/// Ticks fire at the configured interval; renders fire whenever state
/// changed (a tick or a terminal event was delivered) rather than on
/// their own timer, so an idle screen costs nothing.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            // Always render once on startup.
            dirty: true,
        }
    }
}

impl EventLoop {
    /// Sets the tick interval; `None` disables tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    /// Blocks until the next event is due and returns it.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }
            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            // Without a tick interval, block until input arrives.
            if let Some(interval) = self.tick_interval {
                let timeout = (self.last_tick + interval).saturating_duration_since(now);
                if !event::poll(timeout)? {
                    continue;
                }
            }
            self.dirty = true;
            return Ok(TuiEvent::Crossterm(event::read()?));
        }
    }
}
