use axum::{Json, extract::State, extract::rejection::JsonRejection};
use campus_crush_services::{DocumentEvent, Outcome};

use crate::{error::ApiError, state::AppState};

/// Receives one document event and reports what the handlers did with it.
/// Handler-level failures are part of the outcome, not an HTTP error.
pub async fn handle(
    State(state): State<AppState>,
    event: Result<Json<DocumentEvent>, JsonRejection>,
) -> Result<Json<Outcome>, ApiError> {
    let Json(event) = event?;
    let outcome = state.dispatcher.dispatch(event).await;
    Ok(Json(outcome))
}
