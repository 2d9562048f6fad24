use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::Response,
    routing::get,
    Router,
};

use crate::controllers::depot_controller::DepotController;
use crate::controllers::history_controller::HistoryController;
use crate::dto::history_dto::RangeParams;
use crate::models::history::HistoryField;
use crate::services::export::CsvExport;
use crate::state::AppState;
use crate::utils::errors::{internal_error, AppError};

pub fn create_export_router() -> Router<AppState> {
    Router::new()
        .route("/current.csv", get(export_current))
        .route("/checkins.csv", get(export_checkins))
        .route("/checkouts.csv", get(export_checkouts))
}

fn csv_response(export: CsvExport) -> Result<Response, AppError> {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        )
        .body(Body::from(export.content))
        .map_err(|e| internal_error(&format!("Error armando la respuesta CSV: {}", e)))
}

async fn export_current(State(state): State<AppState>) -> Result<Response, AppError> {
    let controller = DepotController::new(state);
    csv_response(controller.export_current().await?)
}

async fn export_checkins(
    State(state): State<AppState>,
    Query(range): Query<RangeParams>,
) -> Result<Response, AppError> {
    let controller = HistoryController::new(state);
    let export = controller
        .export_range(HistoryField::CheckIn, &range.from, &range.to)
        .await?;
    csv_response(export)
}

async fn export_checkouts(
    State(state): State<AppState>,
    Query(range): Query<RangeParams>,
) -> Result<Response, AppError> {
    let controller = HistoryController::new(state);
    let export = controller
        .export_range(HistoryField::CheckOut, &range.from, &range.to)
        .await?;
    csv_response(export)
}
