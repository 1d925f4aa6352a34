use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::Request,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};
use uuid::Uuid;

use pshield_core::{ProtectOptions, ProtectOutcome};
use pshield_engine::Shield;

use crate::protocol::{AnonymizeRequest, RevealRequest, RevealResponse};

pub struct ShieldServer {
    pub shield: Shield,
    /// Options used for fields a request leaves out
    pub defaults: ProtectOptions,
}

impl ShieldServer {
    pub fn new(shield: Shield, defaults: ProtectOptions) -> Self {
        Self { shield, defaults }
    }

    pub fn router(self: Arc<Self>) -> Router {
        // Browser extensions call from arbitrary origins
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                path = %request.uri().path(),
            )
        });

        Router::new()
            .route("/", get(handle_info))
            .route("/anonymize", post(handle_anonymize))
            .route("/reveal", post(handle_reveal))
            .route("/api/rules", get(api_rules))
            .layer(trace)
            .layer(cors)
            .with_state(self)
    }

    pub async fn serve(self, host: &str, port: u16) -> anyhow::Result<()> {
        let app = Arc::new(self).router();

        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).await?;

        info!("pshield server listening on {}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// GET handler for server info/health check
async fn handle_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "pshield",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /anonymize - Protect a text with a fresh mapping
async fn handle_anonymize(
    State(server): State<Arc<ShieldServer>>,
    Json(req): Json<AnonymizeRequest>,
) -> Json<ProtectOutcome> {
    let options = req.options(&server.defaults);
    Json(server.shield.protect(&req.text, &options).await)
}

/// POST /reveal - Restore placeholders from a mapping
async fn handle_reveal(Json(req): Json<RevealRequest>) -> Json<RevealResponse> {
    Json(RevealResponse {
        result: req.mapping.restore(&req.text, &req.aliases),
    })
}

/// GET /api/rules - Active rule table
async fn api_rules(State(server): State<Arc<ShieldServer>>) -> Json<serde_json::Value> {
    Json(serde_json::json!(server.shield.rules().describe()))
}
