// Scribe CLI entry point

use clap::Parser;
use scribe_cli::{logging, output, router::Cli, CommandRouter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    if let Err(e) = CommandRouter::dispatch(&cli).await {
        output::print_error(&e.user_message());
        tracing::debug!("{:?}", e);
        std::process::exit(1);
    }
}
