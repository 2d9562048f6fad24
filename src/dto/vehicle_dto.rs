use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::fees::FeeBreakdown;
use crate::models::history::HistoryEntry;
use crate::models::vehicle::{Extra, VehicleRecord};
use crate::utils::timefmt::fmt_minute;

/// Request para ingresar un vehículo.
/// `zone` es el índice 0-based; las responses exponen la zona 1-based.
#[derive(Debug, Deserialize, Validate)]
pub struct AddVehicleRequest {
    pub zone: i64,

    #[validate(length(min = 1, max = 64))]
    pub vin: String,

    #[validate(length(min = 1, max = 64))]
    pub storage_code: String,

    pub ready_date: Option<String>,
    pub ready_time: Option<String>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Request para mover un vehículo a otra zona
#[derive(Debug, Deserialize, Validate)]
pub struct MoveVehicleRequest {
    pub to_zone: i64,
}

/// Parámetros de búsqueda por identificador
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Response de un vehículo almacenado
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub vin: String,
    pub storage_code: String,
    pub zone: usize,
    pub check_in: String,
    pub ready_date: Option<String>,
    pub ready_time: Option<String>,
    pub notes: String,
    pub extras: Vec<Extra>,
}

impl VehicleResponse {
    pub fn from_record(record: &VehicleRecord, zone: usize) -> Self {
        Self {
            id: record.id,
            vin: record.vin.clone(),
            storage_code: record.storage_code.clone(),
            zone: zone + 1,
            check_in: fmt_minute(&record.check_in),
            ready_date: record.ready_date.clone(),
            ready_time: record.ready_time.clone(),
            notes: record.notes.clone(),
            extras: record.extras.clone(),
        }
    }
}

/// Response de una salida: la estancia cerrada con su tarifa congelada
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub id: Uuid,
    pub vin: String,
    pub storage_code: String,
    pub zone: usize,
    pub check_in: String,
    pub check_out: String,
    pub fee: FeeBreakdown,
}

/// Resultado de búsqueda, del depósito actual o del historial
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub source: String,
    pub id: Uuid,
    pub vin: String,
    pub storage_code: String,
    pub zone: usize,
    pub check_in: String,
    pub check_out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<FeeBreakdown>,
}

impl SearchResult {
    pub fn from_current(
        record: &VehicleRecord,
        zone: usize,
        fee_preview: FeeBreakdown,
    ) -> Self {
        Self {
            source: "current".to_string(),
            id: record.id,
            vin: record.vin.clone(),
            storage_code: record.storage_code.clone(),
            zone: zone + 1,
            check_in: fmt_minute(&record.check_in),
            check_out: None,
            fee: Some(fee_preview),
        }
    }

    pub fn from_history(entry: &HistoryEntry) -> Self {
        Self {
            source: "history".to_string(),
            id: entry.id,
            vin: entry.vin.clone(),
            storage_code: entry.storage_code.clone(),
            zone: entry.zone_in,
            check_in: fmt_minute(&entry.check_in),
            check_out: entry.check_out.as_ref().map(fmt_minute),
            fee: entry.fee.clone(),
        }
    }
}

/// Resumen de ocupación por zona
#[derive(Debug, Serialize)]
pub struct ZoneSummary {
    pub zone: usize,
    pub count: usize,
}

/// Response del resumen general del depósito
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub occupied: usize,
    pub free: usize,
    pub capacity: usize,
    pub zones: Vec<ZoneSummary>,
}

/// Response del escaneo OCR; los campos ausentes se devuelven vacíos
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub vin: String,
    pub storage_code: String,
}
