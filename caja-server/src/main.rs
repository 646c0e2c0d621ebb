use caja_server::{Config, Server, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, work dir, logging)
    caja_server::core::setup_environment()?;

    tracing::info!("Caja Server starting...");

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize server state (storage, manager, services)
    let state = ServerState::initialize(&config)?;

    // 4. Run the HTTP server until shutdown
    let server = Server::with_state(config, state);
    server.run().await?;

    Ok(())
}
