//! Route definitions for the `/habits` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::habit;
use crate::state::AppState;

/// Routes mounted at `/habits`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// PATCH  /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(habit::list).post(habit::create))
        .route(
            "/{id}",
            get(habit::get_by_id)
                .put(habit::update)
                .patch(habit::update)
                .delete(habit::delete),
        )
}
