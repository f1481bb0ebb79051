use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app::App;
use crate::error::KiraError;
use crate::output::{AbundanceBody, ErrorBody, MetadataBody, abundance_body};

#[derive(Debug, Clone)]
pub struct ServerState {
    app: App,
    request_timeout: Duration,
}

impl ServerState {
    pub fn new(app: App, request_timeout: Duration) -> Self {
        Self {
            app,
            request_timeout,
        }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&App) -> Result<T, KiraError> + Send + 'static,
    {
        let app = self.app.clone();
        let task = tokio::task::spawn_blocking(move || op(&app));
        match tokio::time::timeout(self.request_timeout, task).await {
            Ok(Ok(result)) => result.map_err(ApiError),
            Ok(Err(join)) => Err(ApiError(KiraError::Server(join.to_string()))),
            Err(_) => Err(ApiError(KiraError::Timeout(
                self.request_timeout.as_millis() as u64,
            ))),
        }
    }
}

pub struct ApiError(pub KiraError);

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            KiraError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            KiraError::InvalidColumn(_) => (StatusCode::NOT_FOUND, "invalid_column"),
            KiraError::EmptyResult(_) => (StatusCode::NOT_FOUND, "empty_result"),
            KiraError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        (status, Json(ErrorBody::new(code, self.0.to_string()))).into_response()
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/names", get(names))
        .route("/otu", get(otu))
        .route("/metadata/{sample}", get(metadata))
        .route("/wfreq/{sample}", get(wfreq))
        .route("/samples/{sample}", get(samples))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: ServerState, bind: SocketAddr) -> Result<(), KiraError> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|err| KiraError::Server(format!("bind {bind}: {err}")))?;
    info!(%bind, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| KiraError::Server(err.to_string()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn names(State(state): State<ServerState>) -> Result<Json<Vec<String>>, ApiError> {
    let names = state.run(|app| app.names()).await?;
    Ok(Json(names))
}

async fn otu(State(state): State<ServerState>) -> Result<Json<Vec<Option<String>>>, ApiError> {
    let descriptions = state.run(|app| app.otu()).await?;
    Ok(Json(descriptions))
}

async fn metadata(
    State(state): State<ServerState>,
    Path(sample): Path<String>,
) -> Result<Json<MetadataBody>, ApiError> {
    let metadata = state.run(move |app| app.metadata(&sample)).await?;
    Ok(Json(MetadataBody::from(metadata)))
}

async fn wfreq(
    State(state): State<ServerState>,
    Path(sample): Path<String>,
) -> Result<Json<Option<i64>>, ApiError> {
    let frequency = state.run(move |app| app.wfreq(&sample)).await?;
    Ok(Json(frequency))
}

async fn samples(
    State(state): State<ServerState>,
    Path(sample): Path<String>,
) -> Result<Json<Vec<AbundanceBody>>, ApiError> {
    let abundance = state.run(move |app| app.samples(&sample)).await?;
    Ok(Json(abundance_body(abundance)))
}
