mod command;
mod registry;
mod tui;
mod ui;

fn main() -> anyhow::Result<()> {
    command::run()
}
