use std::env;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use kbchat_backend::core::config::Settings;
use kbchat_backend::server::router::router;
use kbchat_backend::state::AppState;
use kbchat_backend::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("invalid configuration")?;
    logging::init(&settings);

    let state = AppState::initialize(settings);

    let port = env::var("PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(8080);
    let bind_addr = format!("127.0.0.1:{}", port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!(
        "Listening on {} (model {}, knowledge base {})",
        addr,
        state.settings.model_id,
        state.settings.knowledge_base_id
    );

    let app: Router = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
