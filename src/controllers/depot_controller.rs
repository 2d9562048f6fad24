use uuid::Uuid;
use validator::Validate;

use crate::config::{AREAS, MAX_CAPACITY};
use crate::dto::vehicle_dto::{
    AddVehicleRequest, CheckoutResponse, MoveVehicleRequest, OverviewResponse, ScanResponse,
    SearchResult, VehicleResponse, ZoneSummary,
};
use crate::models::vehicle::VehicleRecord;
use crate::services::export::{self, CsvExport};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::timefmt::{fmt_minute, now_minute};
use crate::utils::validation::validate_zone_index;

/// Orquestación de las operaciones del depósito.
///
/// Cada mutación toma la guarda de escritura sobre la unidad de estado,
/// muta ocupación e historial juntos y persiste antes de soltar el lock:
/// la secuencia completa es atómica para cualquier observador externo.
pub struct DepotController {
    state: AppState,
}

fn normalize_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl DepotController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn add_vehicle(
        &self,
        request: AddVehicleRequest,
    ) -> AppResult<VehicleResponse> {
        request.validate()?;
        let zone = validate_zone_index(request.zone, AREAS)?;
        let vin = self.state.extractor.validate_vin(&request.vin)?;
        let storage_code = self
            .state
            .extractor
            .validate_storage_code(&request.storage_code)?;

        let check_in = now_minute();
        let notes = request.notes.unwrap_or_default().trim().to_string();
        // los extras se derivan una única vez, al crear el registro
        let extras = self.state.fees.derive_extras(&notes, check_in.date());

        let record = VehicleRecord {
            id: Uuid::new_v4(),
            vin,
            storage_code,
            check_in,
            ready_date: normalize_opt(request.ready_date),
            ready_time: normalize_opt(request.ready_time),
            notes,
            extras,
        };

        let mut yard = self.state.yard.write().await;
        yard.store.add(zone, record.clone())?;
        yard.ledger.open_entry(&record, zone);
        self.state.storage.save(&yard)?;

        log::info!("🚗 Vehículo {} ingresado en zona {}", record.vin, zone + 1);
        Ok(VehicleResponse::from_record(&record, zone))
    }

    pub async fn remove_vehicle(&self, id: Uuid) -> AppResult<CheckoutResponse> {
        let mut yard = self.state.yard.write().await;
        let (zone, record) = yard.store.remove(id)?;

        let check_out = now_minute();
        let fee = self
            .state
            .fees
            .calculate(record.ready_date.as_deref(), &record.extras, check_out);

        if !yard.ledger.close_entry(&record.vin, zone, check_out, fee.clone()) {
            log::warn!(
                "⚠️ No había entrada abierta en el historial para el VIN {}",
                record.vin
            );
        }
        self.state.storage.save(&yard)?;

        log::info!("🚚 Vehículo {} retirado de zona {}", record.vin, zone + 1);
        Ok(CheckoutResponse {
            id: record.id,
            vin: record.vin,
            storage_code: record.storage_code,
            zone: zone + 1,
            check_in: fmt_minute(&record.check_in),
            check_out: fmt_minute(&check_out),
            fee,
        })
    }

    pub async fn move_vehicle(
        &self,
        id: Uuid,
        request: MoveVehicleRequest,
    ) -> AppResult<VehicleResponse> {
        let target = validate_zone_index(request.to_zone, AREAS)?;

        let mut yard = self.state.yard.write().await;
        let from = yard.store.relocate(id, target)?;
        self.state.storage.save(&yard)?;

        log::info!(
            "↔️ Vehículo {} movido de zona {} a zona {}",
            id,
            from + 1,
            target + 1
        );

        let record = yard
            .store
            .find_by_id(id)
            .map(|(_, r)| r.clone())
            .ok_or_else(|| AppError::Internal("Registro perdido durante la reubicación".to_string()))?;
        Ok(VehicleResponse::from_record(&record, target))
    }

    /// Búsqueda por identificador: primero el depósito actual, después el
    /// historial en orden cronológico inverso. Un único primer match.
    pub async fn search(&self, query: Option<String>) -> AppResult<Vec<SearchResult>> {
        let query = query.unwrap_or_default();
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let yard = self.state.yard.read().await;
        if let Some((zone, record)) = yard.store.find_by_identifier(&query) {
            // tarifa consultiva al momento de la búsqueda
            let fee = self.state.fees.calculate(
                record.ready_date.as_deref(),
                &record.extras,
                now_minute(),
            );
            return Ok(vec![SearchResult::from_current(record, zone, fee)]);
        }

        if let Some(entry) = yard.ledger.search_by_identifier(&query) {
            return Ok(vec![SearchResult::from_history(entry)]);
        }

        Ok(Vec::new())
    }

    pub async fn overview(&self) -> OverviewResponse {
        let yard = self.state.yard.read().await;
        let occupied = yard.store.total();
        OverviewResponse {
            occupied,
            free: MAX_CAPACITY.saturating_sub(occupied),
            capacity: MAX_CAPACITY,
            zones: yard
                .store
                .zone_counts()
                .into_iter()
                .enumerate()
                .map(|(zone, count)| ZoneSummary {
                    zone: zone + 1,
                    count,
                })
                .collect(),
        }
    }

    pub async fn scan(&self, image: Vec<u8>) -> AppResult<ScanResponse> {
        let text = self.state.recognition.parse_image(image).await?;
        let found = self.state.extractor.extract_from_text(&text)?;
        Ok(ScanResponse {
            vin: found.vin.unwrap_or_default(),
            storage_code: found.storage_code.unwrap_or_default(),
        })
    }

    pub async fn export_current(&self) -> AppResult<CsvExport> {
        let yard = self.state.yard.read().await;
        export::current_vehicles_csv(&yard.store, now_minute())
    }
}
