use axum::http::HeaderValue;
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use jotter_api::database::manager::DatabaseManager;
use jotter_api::error::ApiError;
use jotter_api::{config, middleware};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Jotter API in {:?} mode", config.environment);

    // Apply the schema; the server still starts degraded if the database is
    // not reachable yet, and /health reports it
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::warn!("Database not ready at startup: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("JOTTER_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Jotter API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .merge(auth_public_routes())
        // Protected API
        .merge(auth_routes())
        .merge(notes_routes())
        // Uniform envelope for unknown routes
        .fallback(not_found)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use jotter_api::handlers::public::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup_post))
        .route("/api/auth/login", post(auth::login_post))
}

fn auth_routes() -> Router {
    use jotter_api::handlers::protected::auth;

    Router::new()
        .route(
            "/api/auth/profile",
            get(auth::profile_get).put(auth::profile_put),
        )
        // JWT verification runs first, then the store re-check
        .route_layer(axum::middleware::from_fn(
            middleware::validate_user_middleware,
        ))
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn notes_routes() -> Router {
    use jotter_api::handlers::protected::notes;

    Router::new()
        .route("/api/notes", get(notes::notes_get).post(notes::note_post))
        .route("/api/notes/search", get(notes::notes_search))
        .route(
            "/api/notes/:id",
            get(notes::note_get)
                .put(notes::note_put)
                .delete(notes::note_delete),
        )
        // JWT verification runs first, then the store re-check
        .route_layer(axum::middleware::from_fn(
            middleware::validate_user_middleware,
        ))
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let origins = &config::config().security.cors_origins;

    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Jotter API",
            "version": version,
            "description": "REST backend for the Jotter notes application",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "signup": "POST /api/auth/signup (public)",
                "login": "POST /api/auth/login (public)",
                "profile": "GET|PUT /api/auth/profile (protected)",
                "notes": "GET|POST /api/notes (protected)",
                "note": "GET|PUT|DELETE /api/notes/:id (protected)",
                "search": "GET /api/notes/search?q= (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "message": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::not_found(format!("Route {} not found", uri.path()))
}
