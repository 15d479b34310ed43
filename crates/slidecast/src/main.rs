mod app;
mod cli;
mod commands;
mod config;
mod deck;
mod error;
mod player;
mod probe;
mod report;
mod session;
mod timeline;

use clap::Parser;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    let wants_dialogs = cli.wants_dialogs();
    if let Err(err) = cli.run() {
        if wants_dialogs {
            report::dialog(&err);
        } else {
            report::console(&err);
        }
        std::process::exit(1);
    }
}
