//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{HttpBlobGateway, PdfTextExtractor, PgStore, TemplateAnalysisAdapter},
    config::Config,
    error::ApiError,
    web::{
        auth::{login_handler, logout_handler, signup_handler},
        enhanced::{
            create_explanation_handler, delete_enhanced_handler, generate_enhanced_handler,
            list_enhanced_handler, list_explanations_handler, save_enhanced_handler,
        },
        middleware::require_auth,
        rest::{
            create_document_handler, delete_document_handler, get_document_handler,
            list_documents_handler, request_upload_slot_handler, update_document_handler,
            ApiDoc,
        },
        state::AppState,
    },
};
use article_simplifier_core::{enhance::SimplificationService, ingest::IngestPipeline};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(PgStore::new(db_pool.clone()));
    info!("Running database migrations...");
    store.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let gateway = Arc::new(HttpBlobGateway::new(
        reqwest::Client::new(),
        config.blob_gateway_url.clone(),
    ));
    let extractor = Arc::new(PdfTextExtractor::new());
    let analyzer = Arc::new(TemplateAnalysisAdapter::new());

    let pipeline = Arc::new(IngestPipeline::new(store.clone(), gateway, extractor));
    let simplifier = Arc::new(SimplificationService::new(store.clone(), analyzer));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        pipeline,
        simplifier,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/uploads", post(request_upload_slot_handler))
        .route(
            "/documents",
            post(create_document_handler).get(list_documents_handler),
        )
        .route(
            "/documents/{id}",
            get(get_document_handler)
                .patch(update_document_handler)
                .delete(delete_document_handler),
        )
        .route("/documents/{id}/enhance", post(generate_enhanced_handler))
        .route(
            "/documents/{id}/text-explanations",
            get(list_explanations_handler),
        )
        .route(
            "/enhanced-documents",
            post(save_enhanced_handler).get(list_enhanced_handler),
        )
        .route("/enhanced-documents/{id}", delete(delete_enhanced_handler))
        .route("/text-explanations", post(create_explanation_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
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
