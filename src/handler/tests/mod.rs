
use crate::app::{AppState, AppStateBuilder};
use crate::config::Config;
use crate::plivo::VoiceApi;
use axum::response::Response;
use std::sync::Arc;

pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.base_url = "https://ivr.example.com".to_string();
    config.plivo.auth_id = "MA_TEST123".to_string();
    config.plivo.auth_token = "secret".to_string();
    config.caller_id = "+14155550100".to_string();
    config.associate_number = "+918031274121".to_string();
    config
}

pub(crate) fn test_state() -> AppState {
    AppStateBuilder::new()
        .config(test_config())
        .build()
        .unwrap()
}

pub(crate) fn test_state_with_voice(voice: Arc<dyn VoiceApi>) -> AppState {
    AppStateBuilder::new()
        .config(test_config())
        .voice_api(voice)
        .build()
        .unwrap()
}

// Helper function to convert axum response to bytes
pub(crate) async fn response_to_bytes(response: Response) -> Vec<u8> {
    let body = response.into_body();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    bytes.to_vec()
}
