use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;

pub mod call;
pub mod ivr;
pub mod middleware;
#[cfg(test)]
mod tests;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/make-call", post(call::make_call))
        .route("/health", get(call::health))
        .route("/ivr/welcome", get(ivr::welcome).post(ivr::welcome))
        .route("/ivr/language-handler", post(ivr::language_handler))
        .route(
            "/ivr/main-menu/{lang}",
            get(ivr::main_menu).post(ivr::main_menu),
        )
        .route("/ivr/menu-handler/{lang}", post(ivr::menu_handler))
}

/// Form posted by the index page to trigger an outbound call.
#[derive(Debug, Deserialize)]
pub struct MakeCallForm {
    pub destination: String,
}

/// The digits Plivo posts to a `GetDigits` action URL. Plivo sends a lot of
/// other call metadata in the same body, none of which this flow needs.
#[derive(Debug, Deserialize)]
pub struct DigitsForm {
    #[serde(rename = "Digits")]
    pub digits: Option<String>,
}
