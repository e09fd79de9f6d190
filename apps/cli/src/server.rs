//! HTTP endpoint Slack posts slash commands to.

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use color_eyre::eyre::{Result, eyre};
use nebo_core::{Services, handle};
use nebo_shared::NeboError;
use nebo_slack::{SlashCommand, VerificationToken};
use tracing::{error, info, warn};

/// Shared by every request.
#[derive(Clone)]
pub(crate) struct AppState {
    pub services: Services,
    pub token: VerificationToken,
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/slack/command", post(slash_command))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub(crate) async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| eyre!("failed to bind {addr}: {e}"))?;
    info!(%addr, "serving slash commands on /slack/command");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}

async fn slash_command(State(state): State<AppState>, Form(cmd): Form<SlashCommand>) -> Response {
    if !state.token.matches(&cmd.token) {
        warn!(command = %cmd.command, team = %cmd.team_id, "slack verification failed");
        return (StatusCode::UNAUTHORIZED, "slack verification failed").into_response();
    }

    match handle(&state.services, &cmd).await {
        Ok(message) => Json(message).into_response(),
        Err(e) => {
            match &e {
                NeboError::UnknownCommand(_) => warn!(error = %e, "rejected command"),
                _ => error!(command = %cmd.command, error = %e, "command failed"),
            }
            (StatusCode::INTERNAL_SERVER_ERROR, e.reply_text()).into_response()
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
