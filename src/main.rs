use clap::Parser;
use soq_tui::cli::commands::Cli;
use soq_tui::io::{config_io, logging};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = launch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn launch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => config_io::default_config_dir()?,
    };
    logging::init(&config_dir, cli.debug)?;
    let config = config_io::read_config(&config_dir)?;
    tracing::info!(
        config_dir = %config_dir.display(),
        api_url = %config.api_url,
        "qt starting"
    );
    soq_tui::tui::run(&config_dir, &config)
}
