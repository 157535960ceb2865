use crate::app::AppState;
use crate::error::ApiError;
use crate::handler::MakeCallForm;
use crate::plivo::{normalize_destination, CreateCallRequest};
use axum::extract::{Form, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Triggers an outbound call to the submitted destination. The answer URL
/// handed to Plivo points back at `/ivr/welcome`, which takes over once the
/// callee picks up.
pub async fn make_call(
    State(state): State<AppState>,
    Form(form): Form<MakeCallForm>,
) -> Result<Json<Value>, ApiError> {
    let destination = normalize_destination(&form.destination)
        .ok_or_else(|| ApiError::InvalidDestination(form.destination.clone()))?;

    let request = CreateCallRequest {
        from: state.config.caller_id.clone(),
        to: destination.clone(),
        answer_url: state.config.callback_url("/ivr/welcome"),
        answer_method: "GET".to_string(),
    };

    info!(to = destination.as_str(), "triggering outbound call");
    match state.voice.create_call(request).await {
        Ok(created) => Ok(Json(json!({
            "status": "initiated",
            "call_uuid": created.request_uuid,
        }))),
        Err(e) => {
            warn!(to = destination.as_str(), error = %e, "outbound call failed");
            Err(e.into())
        }
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "ivrflow",
    }))
}
