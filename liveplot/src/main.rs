mod commands;
mod handlers;
mod output;

use clap::Parser;
use commands::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = handlers::handle_command(cli) {
        output::print_error(&err.to_string());
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}
