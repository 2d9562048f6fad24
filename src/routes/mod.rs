//! API endpoints
//!
//! Este módulo contiene los endpoints de la API. Los handlers son wrappers
//! finos: delegan toda la lógica en los controllers.

pub mod export_routes;
pub mod history_routes;
pub mod scan_routes;
pub mod vehicle_routes;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::controllers::depot_controller::DepotController;
use crate::dto::vehicle_dto::OverviewResponse;
use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(get_overview))
        .nest("/vehicle", vehicle_routes::create_vehicle_router())
        .nest("/history", history_routes::create_history_router())
        .nest("/export", export_routes::create_export_router())
        .nest("/scan", scan_routes::create_scan_router())
}

async fn get_overview(State(state): State<AppState>) -> Json<OverviewResponse> {
    let controller = DepotController::new(state);
    Json(controller.overview().await)
}
