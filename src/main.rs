use std::process::ExitCode;

use persona_chat::config::AppConfig;
use persona_chat::routes::configure_routes;
use persona_chat::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Subscriber first so configuration warnings are visible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,persona_chat=debug")),
        )
        .init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr;
    let production = config.production;

    let state = match AppState::build(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("fatal: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%bind_addr, production, "Starting server");
    warp::serve(configure_routes(state)).run(bind_addr).await;
    ExitCode::SUCCESS
}
