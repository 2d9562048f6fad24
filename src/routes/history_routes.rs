use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::history_controller::HistoryController;
use crate::dto::history_dto::{HistoryEntryResponse, HistoryQuery};
use crate::state::AppState;

pub fn create_history_router() -> Router<AppState> {
    Router::new().route("/", get(list_history))
}

async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Json<Vec<HistoryEntryResponse>> {
    let controller = HistoryController::new(state);
    Json(controller.recent(params.q).await)
}
