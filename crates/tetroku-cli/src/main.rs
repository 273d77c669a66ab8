mod command;
mod tui;
mod util;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
