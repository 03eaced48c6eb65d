//! The rendered profile form page.

use axum::extract::{Path, State};
use axum::response::Html;
use axum::{Router, routing::get};
use tracing::instrument;
use uuid::Uuid;

use profile_form::application::query_handlers;

use crate::error::ApiError;
use crate::render;
use crate::state::AppState;

/// GET /forms/{form_id}
#[instrument(skip_all, fields(form_id = %form_id))]
async fn form_page(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let view = query_handlers::get_form_by_id(form_id, &*state.event_repository).await?;
    Ok(Html(render::page(&view)))
}

/// Returns the router serving the page.
pub fn router() -> Router<AppState> {
    Router::new().route("/forms/{form_id}", get(form_page))
}
