//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{db::DbAdapter, memory::InMemoryNoteStore, notes_llm::OpenAiNotesAdapter},
    config::Config,
    error::ApiError,
    web::{api_router, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use study_notes_core::ports::{AccountRepository, NoteRepository};
use study_notes_core::NotesGenerator;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Storage & Run Migrations ---
    let (notes_store, accounts): (Arc<dyn NoteRepository>, Arc<dyn AccountRepository>) =
        match &config.database_url {
            Some(database_url) => {
                info!("Connecting to database...");
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(database_url)
                    .await?;
                let db_adapter = Arc::new(DbAdapter::new(db_pool));
                info!("Running database migrations...");
                db_adapter.run_migrations().await?;
                info!("Database migrations complete.");
                (
                    db_adapter.clone() as Arc<dyn NoteRepository>,
                    db_adapter as Arc<dyn AccountRepository>,
                )
            }
            None => {
                warn!("DATABASE_URL is not set; history and accounts are kept in memory only.");
                let memory = Arc::new(InMemoryNoteStore::new());
                (
                    memory.clone() as Arc<dyn NoteRepository>,
                    memory as Arc<dyn AccountRepository>,
                )
            }
        };

    // --- 3. Initialize the Model Adapter ---
    let mut openai_config = OpenAIConfig::new().with_api_key(config.llm.api_key.clone());
    if let Some(api_base) = &config.llm.api_base {
        openai_config = openai_config.with_api_base(api_base.clone());
    }
    let openai_client = Client::with_config(openai_config);
    let notes_adapter = Arc::new(OpenAiNotesAdapter::new(
        openai_client,
        config.llm.note_model.clone(),
    ));
    info!("Using note model {}", config.llm.note_model);

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        notes: NotesGenerator::new(notes_adapter, notes_store),
        accounts,
    });

    // --- 5. Create the Web Router ---
    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    let app = Router::new()
        .merge(
            api_router(app_state)
                .layer(DefaultBodyLimit::max(1024 * 1024))
                .layer(cors),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
