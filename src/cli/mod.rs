//! Command-line interface.

pub mod commands;
pub mod context;
pub mod output;
pub mod types;

use console::style;

use crate::domain::models::Config;
pub use types::{Cli, Commands};

/// Run the parsed command against a loaded configuration
pub async fn dispatch(command: Option<Commands>, config: &Config, json_mode: bool) -> anyhow::Result<()> {
    match command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::execute(config).await,
        Commands::Ask(args) => commands::ask::execute(args, config, json_mode).await,
        Commands::Search(args) => commands::search::execute(args, config, json_mode).await,
        Commands::Ingest(args) => commands::ingest::execute(args, config, json_mode).await,
        Commands::Download(args) => commands::download::execute(args, config, json_mode).await,
    }
}

/// Print an error with its cause chain and exit with status 1
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": causes,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err}", style("Error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  {} {cause}", style("caused by:").dim());
        }
    }
    std::process::exit(1)
}
