use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};

use crate::controllers::depot_controller::DepotController;
use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::ScanResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_scan_router() -> Router<AppState> {
    Router::new().route("/", post(scan_image))
}

async fn scan_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ScanResponse>>, AppError> {
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart inválido: {}", e)))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Imagen ilegible: {}", e)))?;
            image = Some(bytes.to_vec());
        }
    }

    let image = image
        .ok_or_else(|| AppError::Validation("No se recibió ninguna imagen".to_string()))?;

    let controller = DepotController::new(state);
    let response = controller.scan(image).await?;
    Ok(Json(ApiResponse::success(response)))
}
