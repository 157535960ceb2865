use crate::config::Config;
use crate::handler;
use crate::plivo::{PlivoClient, VoiceApi};
use anyhow::Result;
use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
};
use tracing::info;

pub struct AppStateInner {
    pub config: Arc<Config>,
    pub voice: Arc<dyn VoiceApi>,
    pub token: CancellationToken,
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateBuilder {
    pub config: Option<Config>,
    pub voice: Option<Arc<dyn VoiceApi>>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            voice: None,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Inject a voice API implementation, used by tests.
    pub fn voice_api(mut self, voice: Arc<dyn VoiceApi>) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn build(self) -> Result<AppState> {
        let config = Arc::new(self.config.unwrap_or_default());
        let token = CancellationToken::new();

        let voice: Arc<dyn VoiceApi> = match self.voice {
            Some(voice) => voice,
            None => Arc::new(PlivoClient::new(
                config.plivo.auth_id.clone(),
                config.plivo.auth_token.clone(),
            )?),
        };

        Ok(Arc::new(AppStateInner {
            config,
            voice,
            token,
        }))
    }
}

pub async fn run(state: AppState) -> Result<()> {
    let token = state.token.clone();

    let app = create_router(state.clone());
    let addr: SocketAddr = state.config.http_addr.parse()?;
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            return Err(anyhow::anyhow!("Failed to bind to {}: {}", addr, e));
        }
    };

    let http_task = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );

    select! {
        http_result = http_task => {
            match http_result {
                Ok(_) => info!("Server shut down gracefully"),
                Err(e) => {
                    tracing::error!("Server error: {}", e);
                    return Err(anyhow::anyhow!("Server error: {}", e));
                }
            }
        }
        _ = token.cancelled() => {
            info!("Application shutting down due to cancellation");
        }
    }
    Ok(())
}

// Index page handler
async fn index_handler() -> impl IntoResponse {
    match std::fs::read_to_string("static/index.html") {
        Ok(content) => Html(content).into_response(),
        Err(e) => {
            tracing::error!("Failed to read index.html: {}", e);
            Html("<html><body><h1>ivrflow</h1><p>static/index.html is missing</p></body></html>")
                .into_response()
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    if !std::path::Path::new("static/index.html").exists() {
        tracing::error!("static/index.html does not exist");
    }
    let static_files_service = ServeDir::new("static");

    // Browsers only ever hit the call trigger form, webhooks come from Plivo
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let webhook_routes = crate::handler::router().with_state(state);

    let skip_paths = Arc::new(vec!["/static*".to_string(), "/health".to_string()]);

    Router::new()
        .route("/", get(index_handler))
        .nest_service("/static", static_files_service)
        .merge(webhook_routes)
        .layer(axum::middleware::from_fn_with_state(
            skip_paths,
            handler::middleware::log_requests,
        ))
        .layer(cors)
}
