use anyhow::Result;
use clap::Parser;
use cv_builder::app_log;
use cv_builder::cli::{handle_command, Cli};
use cv_builder::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging first
    init_logging()?;

    let cli = Cli::parse();
    if let Err(e) = handle_command(cli).await {
        app_log!(error, "{:#}", e);
        return Err(e);
    }
    Ok(())
}
