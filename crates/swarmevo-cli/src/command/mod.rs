use clap::{Parser, Subcommand};

use crate::registry::Registry;

use self::{demo::DemoArg, learn::LearnArg};

mod demo;
mod learn;
mod list;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve bot weights with the genetic algorithm
    Learn(#[clap(flatten)] LearnArg),
    /// Replay a saved weight vector in a live scenario
    Demo(#[clap(flatten)] DemoArg),
    /// List available scenarios and intelligences
    List,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let registry = Registry::builtin();
    match args.mode {
        Mode::Learn(arg) => learn::run(&arg, &registry)?,
        Mode::Demo(arg) => demo::run(&arg, &registry)?,
        Mode::List => list::run(&registry),
    }
    Ok(())
}
