// POST /api/chat handler

use crate::chat::{client_key, ValidationError};
use crate::models::ErrorResponse;
use crate::state::AppState;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;
use warp::http::StatusCode;

/// Chat bodies are a short message plus six short turns
pub const MAX_BODY_BYTES: usize = 16 * 1024;

pub async fn chat_handler<S, B>(
    forwarded_for: Option<String>,
    real_ip: Option<String>,
    body: S,
    state: Arc<AppState>,
) -> Result<impl warp::Reply, Infallible>
where
    S: Stream<Item = Result<B, warp::Error>>,
    B: Buf,
{
    let client = client_key(forwarded_for.as_deref(), real_ip.as_deref());
    let request_id = Uuid::new_v4();

    // The window is charged before the body is read, so oversized bodies count too
    let outcome = match state.chat.admit(&client) {
        Ok(()) => match read_limited(body, MAX_BODY_BYTES).await {
            Ok(bytes) => state.chat.respond(&client, &bytes).await,
            Err(reason) => Err(reason.into()),
        },
        Err(err) => Err(err),
    };

    match outcome {
        Ok(reply) => {
            info!(%request_id, %client, chars = reply.reply.len(), "POST /api/chat");
            Ok(warp::reply::with_status(
                warp::reply::json(&reply),
                StatusCode::OK,
            ))
        }
        Err(err) => {
            // Caller-side failures stay quiet; provider detail is logged, never returned
            if err.is_server_fault() {
                error!(%request_id, %client, error = %err, "chat route error");
            }
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorResponse::new(err.public_message())),
                err.status(),
            ))
        }
    }
}

/// Collect at most `limit` bytes of a request body
///
/// A body over the limit can only carry an over-long message, so it fails the
/// length rule. A body that breaks off mid-read is an invalid request.
async fn read_limited<S, B>(body: S, limit: usize) -> Result<Bytes, ValidationError>
where
    S: Stream<Item = Result<B, warp::Error>>,
    B: Buf,
{
    let mut body = std::pin::pin!(body);
    let mut collected = BytesMut::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| {
            debug!(error = %e, "failed to read request body");
            ValidationError::InvalidRequest
        })?;
        if collected.len() + chunk.remaining() > limit {
            debug!(limit, "request body over limit");
            return Err(ValidationError::TooLong);
        }
        collected.put(chunk);
    }

    Ok(collected.freeze())
}
