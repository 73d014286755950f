use clap::Parser;
use ouro_core::cli::{handlers, logging, Cli};
use ouro_core::exit::OuroExit;

fn main() -> OuroExit {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);
    OuroExit::from(handlers::run(&cli))
}
