//! `tyler` binary.
//!
//! ```sh
//! tyler init --style api-focused
//! tyler sync --auto-push
//! tyler sync-forever
//! ```

use std::io::IsTerminal;

use clap::Parser;
use tyler::cli::{Cli, Command};
use tyler::commands::{init, sync, visualize};
use tyler::{logging, ui};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Command::Init(args) => {
            let interactive = !args.yes && std::io::stdin().is_terminal();
            tracing::debug!(interactive, "starting init");
            init::run(args.options(), interactive).await
        }
        Command::Sync(args) => sync::run(&args.options()).await,
        Command::SyncForever(args) => sync::run_forever(&args.repo).await,
        Command::Visualize => visualize::run().await,
    };

    if let Err(e) = result {
        ui::error(&format!("✖ {e}"));
        std::process::exit(1);
    }
}
