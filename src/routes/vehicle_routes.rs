use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::depot_controller::DepotController;
use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{
    AddVehicleRequest, CheckoutResponse, MoveVehicleRequest, SearchQuery, SearchResult,
    VehicleResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_vehicle))
        .route("/search", get(search_vehicles))
        .route("/:id", delete(remove_vehicle))
        .route("/:id/move", post(move_vehicle))
}

async fn add_vehicle(
    State(state): State<AppState>,
    Json(request): Json<AddVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = DepotController::new(state);
    let response = controller.add_vehicle(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Vehículo ingresado exitosamente".to_string(),
    )))
}

async fn remove_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CheckoutResponse>>, AppError> {
    let controller = DepotController::new(state);
    let response = controller.remove_vehicle(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Vehículo retirado exitosamente".to_string(),
    )))
}

async fn move_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MoveVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = DepotController::new(state);
    let response = controller.move_vehicle(id, request).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn search_vehicles(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<SearchResult>>, AppError> {
    let controller = DepotController::new(state);
    let response = controller.search(params.q).await?;
    Ok(Json(response))
}
