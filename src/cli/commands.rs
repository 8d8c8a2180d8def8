use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "qt", about = concat!("qt v", env!("CARGO_PKG_VERSION"), " - tasks from the soq service in your terminal"), version)]
pub struct Cli {
    /// Log at debug level
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Config directory (default: ~/.soq)
    #[arg(short = 'c', long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,
}
