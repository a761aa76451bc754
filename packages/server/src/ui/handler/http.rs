//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;

use crate::{
    infrastructure::dto::http::{CreateRoomResponse, RoomSummaryDto},
    infrastructure::prediction::PredictionError,
    ui::state::AppState,
};
use hiroba_shared::time::millis_to_rfc3339;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let prediction = match &state.prediction {
        Some(client) if client.is_healthy().await => "ok",
        Some(_) => "unreachable",
        None => "disabled",
    };

    Json(serde_json::json!({
        "status": "ok",
        "rooms": state.rooms.room_count().await,
        "prediction": prediction,
    }))
}

/// Create an empty room and hand back its id
pub async fn create_room(State(state): State<Arc<AppState>>) -> Json<CreateRoomResponse> {
    let room_id = state.create_room_usecase.execute().await;
    tracing::info!("Created room '{}'", room_id);

    Json(CreateRoomResponse {
        room_id: room_id.into_string(),
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let summaries = state.rooms.room_summaries().await;

    let room_summaries: Vec<RoomSummaryDto> = summaries
        .into_iter()
        .map(|summary| RoomSummaryDto {
            id: summary.id.into_string(),
            member_count: summary.member_count,
            created_at: millis_to_rfc3339(summary.created_at.value()),
        })
        .collect();

    Json(room_summaries)
}

/// Forward a landmark batch to the sign-language prediction service
pub async fn predict_sign(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let Some(client) = &state.prediction else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    match client.predict_sign(&body).await {
        Ok(prediction) => Ok(Json(prediction)),
        Err(PredictionError::Unreachable(e)) => {
            tracing::warn!("Prediction service unreachable: {}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
        Err(PredictionError::BadStatus(status)) => {
            tracing::warn!("Prediction service returned {}", status);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}
