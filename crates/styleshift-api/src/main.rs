use styleshift_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, storage, gateway, routes)
    let (_state, router) = styleshift_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    styleshift_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
