use atria::cli::commands::Cli;
use atria::cli::handlers;
use atria::io::config_io;
use atria::io::logging::{self, LogTarget};
use atria::io::seed_io;
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    let config = match config_io::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let target = match cli.command {
        None => LogTarget::Tui,
        Some(_) => LogTarget::Cli,
    };
    if let Err(e) = logging::init_logging(&config.logging, target) {
        eprintln!("warning: logging disabled: {}", e);
    }
    config_io::log_config_warnings(&config);

    // `--seed` wins over `[data] seed`; neither means the built-in fixture
    let seed_path = cli.seed.clone().or_else(|| config.data.seed.clone());
    let result = match cli.command {
        // No subcommand → launch TUI
        None => seed_io::load_seed(seed_path.as_deref())
            .map_err(Into::into)
            .and_then(|seed| atria::tui::run(seed, &config)),
        Some(_) => handlers::dispatch(cli, seed_path.as_deref()),
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
