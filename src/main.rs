use clap::Parser;
use log::info;
use token_plot::config::{Cli, ServerConfig};
use token_plot::logging;
use token_plot::ui::routes::run_server;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ServerConfig::from_cli(&cli)?;
    logging::init(config.level_filter()?)?;

    info!("Starting token_plot server v{}", env!("CARGO_PKG_VERSION"));
    if let Some(seed) = config.jitter_seed {
        info!("Jitter seeded with {}", seed);
    }
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
    }

    run_server(config).await?;
    Ok(())
}
