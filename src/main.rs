//! yyt - merge YAML/JSON documents, select a node by path and render it
//!
//! Exit status is 0 on success and 1 on any error; usage errors are
//! reported by clap with status 2.

use clap::Parser;
use colored::Colorize;

use yyt::{cli, logging};

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, !cli.no_color);

    if let Err(err) = cli::run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
