use std::path::PathBuf;

use anyhow::Context as _;
use crossterm::event::{Event, KeyCode};
use rand::Rng as _;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use swarmevo_evolution::checkpoint::WeightCheckpoint;
use swarmevo_sim::{BoxedScenario, SimSeed};

use crate::{
    registry::Registry,
    tui::{App, Tui},
    ui::widgets::ArenaDisplay,
};

const FPS: f64 = 30.0;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DemoArg {
    /// Path to a saved weights file (JSON checkpoint)
    weights_path: PathBuf,
    /// Scenario to run the demo in
    #[arg(long, default_value = "free_roam")]
    scenario: String,
    /// Intelligence type the weights belong to
    #[arg(long, default_value = "flocking")]
    intelligence: String,
    /// Number of bots sharing the loaded weights
    #[arg(long, default_value_t = 30)]
    num_bots: usize,
    /// Simulation seed as 32 hex characters (default: random)
    #[arg(long)]
    seed: Option<SimSeed>,
}

pub(crate) fn run(arg: &DemoArg, registry: &Registry) -> anyhow::Result<()> {
    let scenario_spec = registry.scenario(&arg.scenario)?;
    let intelligence_spec = registry.intelligence(&arg.intelligence)?;

    let checkpoint = WeightCheckpoint::load(&arg.weights_path).with_context(|| {
        format!("failed to load weights from {}", arg.weights_path.display())
    })?;
    eprintln!(
        "Loaded weights from generation {} (fitness {:.3})",
        checkpoint.generation, checkpoint.fitness
    );

    // All bots share the same read-only weight vector.
    let intelligences = (0..arg.num_bots)
        .map(|_| intelligence_spec.build(&checkpoint.weights))
        .collect::<Result<Vec<_>, _>>()?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let scenario = scenario_spec.build(intelligences, seed)?;

    let title = format!("{} / {} demo", arg.scenario, arg.intelligence);
    let mut app = DemoApp::new(scenario, title);
    Tui::new().run(&mut app)
}

/// Drives one scenario indefinitely on the TUI tick loop.
struct DemoApp {
    scenario: BoxedScenario,
    title: String,
    paused: bool,
    exiting: bool,
    ticks: u64,
}

impl DemoApp {
    fn new(scenario: BoxedScenario, title: String) -> Self {
        Self {
            scenario,
            title,
            paused: false,
            exiting: false,
            ticks: 0,
        }
    }
}

impl App for DemoApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
    }

    fn should_exit(&self) -> bool {
        self.exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        if let Event::Key(key) = event {
            match key.code {
                KeyCode::Char('p') => self.paused = !self.paused,
                KeyCode::Char('q') | KeyCode::Esc => self.exiting = true,
                _ => {}
            }
        }
    }

    fn update(&mut self, _tui: &mut Tui) {
        if !self.paused {
            self.scenario.step();
            self.ticks += 1;
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [arena_area, status_area, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(ArenaDisplay::new(self.scenario.as_ref(), &self.title), arena_area);

        let status = format!(
            "Tick {} | Fitness so far: {:.3}{}",
            self.ticks,
            self.scenario.fitness(),
            if self.paused { " | PAUSED" } else { "" }
        );
        frame.render_widget(Text::from(status).centered(), status_area);

        let help = if self.paused {
            "Controls: p (Resume) | q (Quit)"
        } else {
            "Controls: p (Pause) | q (Quit)"
        };
        frame.render_widget(
            Text::from(help)
                .style(Style::default().fg(Color::DarkGray))
                .centered(),
            help_area,
        );
    }
}
