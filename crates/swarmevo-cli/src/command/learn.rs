use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode};
use rand::Rng as _;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use swarmevo_evolution::{
    checkpoint::{Checkpointer, WeightCheckpoint},
    evaluator::{EvolutionObserver, FrameContext},
    genetic::{GenerationStats, Population},
    runner::{EvolutionLoop, EvolutionParams, StopToken},
};
use swarmevo_sim::{Scenario, SimSeed};
use swarmevo_stats::descriptive::DescriptiveStats;

use crate::{registry::Registry, ui::widgets::ArenaDisplay};

/// Visualization frame-rate cap; the simulation itself runs unthrottled.
const VIS_FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LearnArg {
    /// Scenario to evolve in
    #[arg(long, default_value = "free_roam")]
    scenario: String,
    /// Intelligence type to evolve weights for
    #[arg(long, default_value = "flocking")]
    intelligence: String,
    /// Number of generations to evolve
    #[arg(long, default_value_t = 100)]
    generations: usize,
    /// Number of individuals in the population
    #[arg(long, default_value_t = 50)]
    population_size: usize,
    /// Number of frames to simulate per fitness evaluation
    #[arg(long, default_value_t = 500)]
    generation_frames: usize,
    /// Number of bots sharing one weight vector per evaluation
    #[arg(long, default_value_t = 10)]
    eval_bots: usize,
    /// Probability of mutating each weight
    #[arg(long, default_value_t = 0.1)]
    mutation_rate: f32,
    /// Relative magnitude of one mutation
    #[arg(long, default_value_t = 0.2)]
    mutation_range: f32,
    /// Fraction of top performers kept unchanged
    #[arg(long, default_value_t = 0.1)]
    elite_percentage: f32,
    /// Number of individuals in each tournament draw
    #[arg(long, default_value_t = 5)]
    tournament_size: usize,
    /// Gene range for random initialization
    #[arg(long, default_value_t = 1.0)]
    init_range: f32,
    /// Directory to save checkpoints to (default: auto-generated)
    #[arg(long)]
    save_dir: Option<PathBuf>,
    /// Load initial weights from a checkpoint file
    #[arg(long)]
    load_weights: Option<PathBuf>,
    /// Run seed as 32 hex characters (default: random)
    #[arg(long)]
    seed: Option<SimSeed>,
    /// Show a live view of every evaluation (disables parallel evaluation)
    #[arg(long)]
    visualize: bool,
}

pub(crate) fn run(arg: &LearnArg, registry: &Registry) -> anyhow::Result<()> {
    let scenario_spec = registry.scenario(&arg.scenario)?;
    let intelligence_spec = registry.intelligence(&arg.intelligence)?;

    let run_seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let save_dir = arg
        .save_dir
        .clone()
        .unwrap_or_else(|| default_save_dir(&arg.scenario, &arg.intelligence));

    let params = EvolutionParams {
        population_size: arg.population_size,
        generation_frames: arg.generation_frames,
        eval_bots: arg.eval_bots,
        mutation_rate: arg.mutation_rate,
        mutation_range: arg.mutation_range,
        elite_percentage: arg.elite_percentage,
        tournament_size: arg.tournament_size,
        init_range: arg.init_range,
        visualize: arg.visualize,
    };
    let mut evolution = EvolutionLoop::new(scenario_spec, intelligence_spec, params, run_seed)?;

    if let Some(path) = &arg.load_weights {
        eprintln!("\nLoading initial weights from: {}", path.display());
        let checkpoint = WeightCheckpoint::load(path)
            .with_context(|| format!("failed to load initial weights from {}", path.display()))?;
        evolution = evolution.with_initial_weights(checkpoint.weights)?;
    }

    print_config(arg, run_seed, &save_dir);

    let checkpointer = Checkpointer::new(&save_dir);
    let stop = StopToken::new();
    let history = if arg.visualize {
        ratatui::run(|terminal| -> anyhow::Result<Vec<GenerationStats>> {
            let mut observer = VisualObserver::new(terminal, &stop);
            let history = evolution.run(arg.generations, &checkpointer, &mut observer, &stop)?;
            observer.into_result()?;
            Ok(history)
        })?
    } else {
        evolution.run(arg.generations, &checkpointer, &mut ConsoleObserver, &stop)?
    };

    report_outcome(arg, &history, &checkpointer);
    Ok(())
}

fn default_save_dir(scenario: &str, intelligence: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from("evolution_results").join(format!("{scenario}_{intelligence}_{timestamp}"))
}

fn print_config(arg: &LearnArg, run_seed: SimSeed, save_dir: &std::path::Path) {
    eprintln!();
    eprintln!("Starting evolution with:");
    eprintln!("Scenario: {}", arg.scenario);
    eprintln!("Intelligence: {}", arg.intelligence);
    eprintln!();
    eprintln!("Evolution parameters:");
    eprintln!("- Generations: {}", arg.generations);
    eprintln!("- Population size: {}", arg.population_size);
    eprintln!("- Generation frames: {}", arg.generation_frames);
    eprintln!("- Bots per evaluation: {}", arg.eval_bots);
    eprintln!("- Tournament size: {}", arg.tournament_size);
    eprintln!("- Elite percentage: {}%", arg.elite_percentage * 100.0);
    eprintln!("- Mutation rate: {}", arg.mutation_rate);
    eprintln!("- Mutation range: ±{}%", arg.mutation_range * 100.0);
    eprintln!("- Seed: {run_seed}");
    eprintln!();
    eprintln!("Saving results to: {}", save_dir.display());
    eprintln!();
}

fn report_outcome(arg: &LearnArg, history: &[GenerationStats], checkpointer: &Checkpointer) {
    let Some(best) = history
        .iter()
        .max_by(|a, b| a.max_fitness.total_cmp(&b.max_fitness))
    else {
        eprintln!();
        eprintln!("No generations were run.");
        return;
    };

    eprintln!();
    if history.len() < arg.generations {
        eprintln!(
            "Stopped after {} of {} generations.",
            history.len(),
            arg.generations
        );
    }
    eprintln!("Evolution complete!");
    eprintln!(
        "Best fitness: {:.3} (Generation {})",
        best.max_fitness, best.generation
    );
    eprintln!("Best weights: {:.3?}", best.best_weights);
    eprintln!("Results saved in: {}", checkpointer.save_dir().display());

    let best_file = checkpointer.checkpoint_path(best.generation);
    eprintln!();
    eprintln!("To see these weights in action, run:");
    eprintln!(
        "  swarmevo demo {} --scenario {} --intelligence {}",
        best_file.display(),
        arg.scenario,
        arg.intelligence
    );
}

fn mean_normalized_spread(weight_stats: &[DescriptiveStats]) -> f32 {
    if weight_stats.is_empty() {
        return 0.0;
    }
    #[expect(clippy::cast_precision_loss)]
    let len = weight_stats.len() as f32;
    weight_stats
        .iter()
        .map(|s| s.normalized_std_dev)
        .sum::<f32>()
        / len
}

/// Per-generation progress reporting for headless runs.
struct ConsoleObserver;

impl EvolutionObserver for ConsoleObserver {
    fn on_generation(&mut self, stats: &GenerationStats, population: &Population) {
        let spread = mean_normalized_spread(&population.weight_stats());
        eprintln!("Generation #{}:", stats.generation);
        eprintln!(
            "  Fitness: min {:.3} / mean {:.3} / max {:.3}",
            stats.min_fitness, stats.mean_fitness, stats.max_fitness
        );
        eprintln!("  Best weights: {:.3?}", stats.best_weights);
        eprintln!("  Weight spread: {spread:.3}");
    }
}

/// Live training view: draws every evaluated frame and wires `q` to the
/// cooperative stop token.
struct VisualObserver<'a> {
    terminal: &'a mut DefaultTerminal,
    stop: &'a StopToken,
    last_stats: Option<GenerationStats>,
    last_draw: Instant,
    failure: Option<anyhow::Error>,
}

impl<'a> VisualObserver<'a> {
    fn new(terminal: &'a mut DefaultTerminal, stop: &'a StopToken) -> Self {
        Self {
            terminal,
            stop,
            last_stats: None,
            last_draw: Instant::now(),
            failure: None,
        }
    }

    /// Surfaces the first draw/input error that occurred, if any.
    fn into_result(self) -> anyhow::Result<()> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn poll_input(&mut self) -> anyhow::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()?
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                self.stop.request_stop();
            }
        }
        Ok(())
    }
}

impl EvolutionObserver for VisualObserver<'_> {
    fn on_frame(&mut self, scenario: &dyn Scenario, context: &FrameContext) {
        if self.failure.is_some() {
            return;
        }
        if let Err(err) = self.poll_input() {
            self.failure = Some(err);
            return;
        }
        if self.last_draw.elapsed() < VIS_FRAME_INTERVAL {
            return;
        }
        self.last_draw = Instant::now();

        let last_stats = self.last_stats.as_ref();
        let stopping = self.stop.is_stop_requested();
        let result = self.terminal.draw(|frame| {
            draw_training(frame, scenario, context, last_stats, stopping);
        });
        if let Err(err) = result {
            self.failure = Some(err.into());
        }
    }

    fn on_generation(&mut self, stats: &GenerationStats, _population: &Population) {
        self.last_stats = Some(stats.clone());
    }
}

fn draw_training(
    frame: &mut Frame,
    scenario: &dyn Scenario,
    context: &FrameContext,
    last_stats: Option<&GenerationStats>,
    stopping: bool,
) {
    let [arena_area, status_area, help_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = format!(
        "Generation {} | Individual {}/{} | Frame {}/{}",
        context.generation,
        context.individual + 1,
        context.population_size,
        context.frame + 1,
        context.generation_frames
    );
    frame.render_widget(ArenaDisplay::new(scenario, &title), arena_area);

    let status = match last_stats {
        Some(stats) => format!(
            "Last generation best: {:.3} (gen {})",
            stats.max_fitness, stats.generation
        ),
        None => "First generation in progress".to_owned(),
    };
    frame.render_widget(Text::from(status).centered(), status_area);

    let help = if stopping {
        "Stopping after this generation..."
    } else {
        "Controls: q (stop after this generation)"
    };
    frame.render_widget(
        Text::from(help)
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        help_area,
    );
}
