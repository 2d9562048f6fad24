use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fees::FeeBreakdown;
use crate::models::history::HistoryEntry;
use crate::utils::timefmt::fmt_minute;

/// Parámetros del listado de historial
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub q: Option<String>,
}

/// Rango de fechas para los exports de historial
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub from: String,
    pub to: String,
}

/// Response de una entrada del historial
#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    pub vin: String,
    pub storage_code: String,
    pub zone_in: usize,
    pub check_in: String,
    pub zone_out: Option<usize>,
    pub check_out: Option<String>,
    pub ready_date: Option<String>,
    pub ready_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<FeeBreakdown>,
}

impl From<&HistoryEntry> for HistoryEntryResponse {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id,
            vin: entry.vin.clone(),
            storage_code: entry.storage_code.clone(),
            zone_in: entry.zone_in,
            check_in: fmt_minute(&entry.check_in),
            zone_out: entry.zone_out,
            check_out: entry.check_out.as_ref().map(fmt_minute),
            ready_date: entry.ready_date.clone(),
            ready_time: entry.ready_time.clone(),
            fee: entry.fee.clone(),
        }
    }
}
