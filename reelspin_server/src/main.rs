use axum::http::StatusCode;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use reelspin_core::{
    reference_audio_tracks, AudioTrack, EngineError, Outcome, OutcomeGenerator, SymbolCatalog,
};
use reelspin_shared::{CatalogResponse, SpinResponse};

struct AppState {
    generator: OutcomeGenerator,
    catalog: SymbolCatalog,
    audio: Vec<AudioTrack>,
}

impl AppState {
    fn new(asset_base_url: &str) -> anyhow::Result<Self> {
        let catalog = SymbolCatalog::reference(asset_base_url);
        Ok(Self {
            generator: OutcomeGenerator::new(&catalog)?,
            catalog,
            audio: reference_audio_tracks(asset_base_url),
        })
    }

    fn resolve_spin(&self) -> Result<Outcome, EngineError> {
        self.generator.generate(&mut rand::rng())
    }
}

struct ServerConfig {
    bind: String,
    static_dir: String,
    asset_base_url: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.into());
        Self {
            bind: var("BIND", "127.0.0.1:3000"),
            static_dir: var("STATIC_DIR", "static"),
            asset_base_url: var("ASSET_BASE_URL", "/static"),
        }
    }
}

async fn route_spin(State(state): State<Arc<AppState>>) -> Result<Json<SpinResponse>, StatusCode> {
    let outcome = state.resolve_spin().map_err(|e| {
        error!("spin generation failed: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    info!(win_type = ?outcome.win_type, bonus = outcome.bonus, "spin resolved");
    Ok(Json(SpinResponse::from(&outcome)))
}

async fn route_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        symbols: state.catalog.images().to_vec(),
        audio: state.audio.clone(),
    })
}

fn app(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .route("/spin", post(route_spin))
        .route("/catalog", get(route_catalog))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env();
    let state = Arc::new(AppState::new(&config.asset_base_url)?);
    info!(
        symbols = state.catalog.len(),
        static_dir = %config.static_dir,
        "catalog loaded"
    );

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("listening on {}", config.bind);
    axum::serve(listener, app(state, &config.static_dir)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = Arc::new(AppState::new("/static").unwrap());
        app(state, "static")
    }

    async fn call(method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn spin_returns_one_based_outcome() {
        for _ in 0..20 {
            let (status, body) = call(Method::POST, "/spin").await;
            assert_eq!(status, StatusCode::OK);
            let resp: SpinResponse = serde_json::from_slice(&body).unwrap();
            assert_eq!(resp.reels.len(), 3);
            assert!(resp.reels.iter().flatten().all(|v| (1..=9).contains(v)));
            // round-trips through client-side validation
            resp.into_outcome(9).unwrap();
        }
    }

    #[tokio::test]
    async fn spin_requires_post() {
        let (status, _) = call(Method::GET, "/spin").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn catalog_lists_symbols_and_audio() {
        let (status, body) = call(Method::GET, "/catalog").await;
        assert_eq!(status, StatusCode::OK);
        let resp: CatalogResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.symbols.len(), 9);
        assert_eq!(resp.symbols[0], "/static/images/sym1.png");
        let big_win = resp.audio.iter().find(|t| t.key == "bigWin").unwrap();
        assert_eq!(big_win.volume, 0.7);
        assert_eq!(resp.catalog().unwrap().len(), 9);
    }
}
