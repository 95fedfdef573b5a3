mod app;
mod cli;
mod commands;
mod config;
mod deck;
mod download;
mod input;
mod logging;
mod media;
mod modal;
mod registry;
mod render;
mod resolve;
mod reveal;
mod theme;
mod view;
mod watch;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet, !cli.no_color);

    cli.run()
}
