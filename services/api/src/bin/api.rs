//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{FileStore, OpenAiChatAdapter},
    config::Config,
    error::ApiError,
    web::{build_router, chat_task::RemoteResponder, state::AppState},
};
use portfolio_core::{
    ChatCompletionService, KeyValueStore, KeywordResponder, MeetingScheduler, QuestionBoard,
    RuleTable, VisitorCounter,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open Local Storage ---
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir)?);
    info!("Storing collections in {}", config.data_dir.display());

    // --- 3. Build the Chat Responder ---
    let rules = match &config.rules_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let table = RuleTable::from_json(&raw)?;
            info!(
                "Loaded {} keyword rules from {}",
                table.rules().len(),
                path.display()
            );
            table
        }
        None => RuleTable::portfolio()?,
    };

    let remote: Option<Arc<dyn ChatCompletionService>> = match &config.chat_api_key {
        Some(api_key) => {
            let client = OpenAiChatAdapter::client(api_key, &config.chat_api_base);
            let adapter: Arc<dyn ChatCompletionService> =
                Arc::new(OpenAiChatAdapter::new(client, config.chat_model.clone()));
            info!("Remote chat enabled with model {}", config.chat_model);
            Some(adapter)
        }
        None => {
            warn!("GROQ_API_KEY not set. The chatbot will use keyword replies only.");
            None
        }
    };
    let responder = RemoteResponder::new(
        remote,
        KeywordResponder::new(rules),
        config.chat_timeout,
    );

    // --- 4. Build the Shared AppState ---
    let board = if config.seed_demo_data {
        QuestionBoard::open(store.clone())
    } else {
        QuestionBoard::empty(store.clone())
    };
    let scheduler = MeetingScheduler::open(store.clone());
    let visitors = VisitorCounter::new(store);
    let app_state = Arc::new(AppState::new(
        config.clone(),
        responder,
        board,
        scheduler,
        visitors,
    ));

    // --- 5. Create the Web Router ---
    let app = build_router(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!("Chat API: http://{}/api/chat", config.bind_address);
    info!("Health check: http://{}/api/health", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
