mod commands;
mod terminal;

use anyhow::Context;
use commands::{CommandLine, Commands, check, watch};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = commands.config();
    cfg.validate().context("invalid settings")?;

    if cfg.no_color {
        colored::control::set_override(false);
    }
    logging::init_logging(cfg.quiet, commands.verbose);
    print::banner(cfg.quiet);

    match commands.command {
        Commands::Watch(args) => {
            print::header("preparing hosts", cfg.quiet);
            watch::watch(args, &cfg).await
        }
        Commands::Check { file } => {
            print::header("checking host list", cfg.quiet);
            check::check(&file, &cfg).await
        }
    }
}
