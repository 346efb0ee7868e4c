mod cli;
mod commands;
mod context;
mod logging;
mod output;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.config.as_path();
    let result = match cli.command {
        Commands::Templates { json, code } => commands::templates::run(json, code),
        Commands::Classify { input } => commands::classify::run(&input),
        Commands::Run {
            id,
            page,
            output,
        } => commands::run::run(config, &id, &page, &output),
        Commands::Eval {
            input,
            page,
            output,
        } => commands::eval::run(config, &input, &page, &output),
        Commands::List { json } => commands::list::run(config, json),
        Commands::Share { id, base } => commands::share::run(config, &id, &base),
        Commands::Install { url } => commands::install::run(config, &url),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
