// Dev-only diagnostic handlers: GET /api/dev/usage and GET /api/dev/model

use crate::llm::LlmError;
use crate::models::{ErrorResponse, ModelCheck};
use crate::state::AppState;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::warn;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

const NOT_IN_PRODUCTION: &str = "Not available in production";

fn forbidden() -> WithStatus<Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse::new(NOT_IN_PRODUCTION)),
        StatusCode::FORBIDDEN,
    )
}

/// Most recent provider usage, plus a short history
pub async fn usage_handler(state: Arc<AppState>) -> Result<WithStatus<Json>, Infallible> {
    if state.production {
        return Ok(forbidden());
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&state.usage_log.report()),
        StatusCode::OK,
    ))
}

/// Whether the configured model is offered by the provider
pub async fn model_check_handler(state: Arc<AppState>) -> Result<WithStatus<Json>, Infallible> {
    if state.production {
        return Ok(forbidden());
    }

    let generator = state.chat.generator();
    let configured = generator.model().to_string();

    let (check, status) = match generator.list_models().await {
        Ok(models) => {
            let has_configured = models
                .iter()
                .any(|name| name.trim_start_matches("models/") == configured);
            let check = ModelCheck {
                configured,
                ok: true,
                available_models: Some(models),
                has_configured: Some(has_configured),
                ..Default::default()
            };
            (check, StatusCode::OK)
        }
        Err(err) => {
            warn!(error = %err, "model list fetch failed");
            let status = match err {
                LlmError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            };
            let check = ModelCheck {
                configured,
                ok: false,
                error: Some(err.to_string()),
                ..Default::default()
            };
            (check, status)
        }
    };

    Ok(warp::reply::with_status(warp::reply::json(&check), status))
}
