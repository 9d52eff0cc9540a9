// Route definitions and handlers

use crate::handlers;
use crate::state::AppState;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

pub fn configure_routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let api = warp::path("api");

    // POST /api/chat
    let chat = api
        .and(warp::path("chat"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::header::optional::<String>("x-forwarded-for"))
        .and(warp::header::optional::<String>("x-real-ip"))
        .and(warp::body::stream())
        .and(with_state(state.clone()))
        .and_then(handlers::chat_handler);

    // GET /api/dev/usage
    let dev_usage = api
        .and(warp::path("dev"))
        .and(warp::path("usage"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::usage_handler);

    // GET /api/dev/model
    let dev_model = api
        .and(warp::path("dev"))
        .and(warp::path("model"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::model_check_handler);

    // Combine routes
    chat.or(dev_usage).or(dev_model)
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
