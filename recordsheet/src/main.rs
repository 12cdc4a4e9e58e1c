use anyhow::Result;
use clap::Parser;

use recordsheet::cli::Cli;
use recordsheet::logging::init_logging;
use recordsheet::settings::Settings;
use recordsheet::App;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(app_root) = cli.app_root {
        settings.app_root = app_root;
    }
    settings.validate()?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = match settings.log_dir() {
        Some(dir) => {
            let (log_path, guard) = init_logging(&dir)?;
            tracing::info!("Logging to {}", log_path.display());
            Some(guard)
        }
        None => None,
    };

    App::new(settings).run(cli.command).await
}
