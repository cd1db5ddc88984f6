use memopay::api::server;
use memopay::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logger (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!("Starting memopay session server on {}", config.bind_address);
    server::start_server(config).await?;
    Ok(())
}
