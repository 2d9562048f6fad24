//! Historial de estancias
//!
//! Registro append-only de entradas y salidas del depósito. Cada estancia
//! produce exactamente una entrada: abierta al ingresar el vehículo y
//! cerrada una única vez al retirarlo, congelando el snapshot de tarifa.
//! Las entradas nunca se eliminan.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fees::FeeBreakdown;
use crate::models::vehicle::VehicleRecord;
use crate::utils::timefmt;

/// Campo de timestamp sobre el que filtra una consulta por rango
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryField {
    CheckIn,
    CheckOut,
}

/// Entrada del historial, una por estancia.
///
/// `zone_in` y `zone_out` se guardan 1-based, que es la numeración visible
/// para el usuario final.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub vin: String,
    pub storage_code: String,
    pub zone_in: usize,
    #[serde(with = "timefmt::minute")]
    pub check_in: NaiveDateTime,
    #[serde(default)]
    pub zone_out: Option<usize>,
    #[serde(default, with = "timefmt::minute_opt")]
    pub check_out: Option<NaiveDateTime>,
    #[serde(default)]
    pub ready_date: Option<String>,
    #[serde(default)]
    pub ready_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<FeeBreakdown>,
}

impl HistoryEntry {
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Match por substring contra VIN o código de almacén.
    /// `query` debe venir ya en mayúsculas.
    pub fn matches_identifier(&self, query: &str) -> bool {
        self.vin.contains(query) || self.storage_code.contains(query)
    }

    fn field(&self, field: HistoryField) -> Option<NaiveDateTime> {
        match field {
            HistoryField::CheckIn => Some(self.check_in),
            HistoryField::CheckOut => self.check_out,
        }
    }
}

/// Secuencia append-only de entradas del historial
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Abrir una entrada para un vehículo recién ingresado.
    /// Se llama exactamente una vez por cada alta exitosa en la tabla de
    /// ocupación. `zone` es el índice 0-based de la zona asignada.
    pub fn open_entry(&mut self, record: &VehicleRecord, zone: usize) {
        self.entries.push(HistoryEntry {
            id: record.id,
            vin: record.vin.clone(),
            storage_code: record.storage_code.clone(),
            zone_in: zone + 1,
            check_in: record.check_in,
            zone_out: None,
            check_out: None,
            ready_date: record.ready_date.clone(),
            ready_time: record.ready_time.clone(),
            fee: None,
        });
    }

    /// Cerrar la entrada abierta más reciente para un VIN, congelando zona de
    /// salida, timestamp y snapshot de tarifa.
    ///
    /// Si no existe una entrada abierta para el VIN, no hace nada y devuelve
    /// `false`; queda en la capa llamante decidir si lo registra.
    pub fn close_entry(
        &mut self,
        vin: &str,
        zone_out: usize,
        check_out: NaiveDateTime,
        fee: FeeBreakdown,
    ) -> bool {
        for entry in self.entries.iter_mut().rev() {
            if entry.vin == vin && entry.is_open() {
                entry.zone_out = Some(zone_out + 1);
                entry.check_out = Some(check_out);
                entry.fee = Some(fee);
                return true;
            }
        }
        false
    }

    /// Entradas cuyo timestamp en `field` cae dentro de
    /// `[from 00:00, to 23:59]` inclusive, con resolución de minuto.
    pub fn range_query(
        &self,
        field: HistoryField,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<&HistoryEntry> {
        let start = from.and_time(chrono::NaiveTime::MIN);
        let end = timefmt::end_of_day(to);
        self.entries
            .iter()
            .filter(|e| {
                e.field(field)
                    .map(|ts| ts >= start && ts <= end)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Primer match en orden cronológico inverso (el más reciente) cuyo VIN o
    /// código de almacén contenga la consulta.
    pub fn search_by_identifier(&self, query: &str) -> Option<&HistoryEntry> {
        let query = query.trim().to_uppercase();
        if query.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .rev()
            .find(|e| e.matches_identifier(&query))
    }

    /// Listado cronológico inverso, con filtro opcional por identificador y
    /// tope de resultados.
    pub fn recent(&self, query: Option<&str>, limit: usize) -> Vec<&HistoryEntry> {
        let query = query.map(|q| q.trim().to_uppercase()).unwrap_or_default();
        self.entries
            .iter()
            .rev()
            .filter(|e| query.is_empty() || e.matches_identifier(&query))
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::FeeStatus;
    use crate::utils::validation::{validate_date, validate_minute};
    use rust_decimal::Decimal;

    fn record(vin: &str, check_in: &str) -> VehicleRecord {
        VehicleRecord {
            id: Uuid::new_v4(),
            vin: vin.to_string(),
            storage_code: "LK12345".to_string(),
            check_in: validate_minute(check_in).unwrap(),
            ready_date: None,
            ready_time: None,
            notes: String::new(),
            extras: Vec::new(),
        }
    }

    fn fee() -> FeeBreakdown {
        FeeBreakdown::without_fees(FeeStatus::NoAppointment, Decimal::ZERO)
    }

    #[test]
    fn test_open_then_close_freezes_snapshot() {
        let mut ledger = HistoryLedger::new();
        let r = record("WDB12345678901234", "2025-03-01 10:00");
        ledger.open_entry(&r, 2);

        let out = validate_minute("2025-03-02 16:30").unwrap();
        assert!(ledger.close_entry("WDB12345678901234", 2, out, fee()));

        let entry = ledger.search_by_identifier("WDB").unwrap();
        assert_eq!(entry.zone_in, 3);
        assert_eq!(entry.zone_out, Some(3));
        assert_eq!(entry.check_out, Some(out));
        assert!(entry.fee.is_some());
        assert!(entry.check_out.unwrap() >= entry.check_in);
    }

    #[test]
    fn test_close_without_open_entry_is_noop() {
        let mut ledger = HistoryLedger::new();
        let out = validate_minute("2025-03-02 16:30").unwrap();
        assert!(!ledger.close_entry("WDB12345678901234", 0, out, fee()));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_close_picks_most_recent_open_entry() {
        let mut ledger = HistoryLedger::new();
        let first = record("WDB12345678901234", "2025-03-01 08:00");
        ledger.open_entry(&first, 0);
        let out = validate_minute("2025-03-01 12:00").unwrap();
        ledger.close_entry("WDB12345678901234", 0, out, fee());

        // el mismo VIN vuelve a ingresar
        let second = record("WDB12345678901234", "2025-03-05 09:00");
        ledger.open_entry(&second, 4);

        let out2 = validate_minute("2025-03-06 10:00").unwrap();
        assert!(ledger.close_entry("WDB12345678901234", 4, out2, fee()));

        // la primera estancia no fue tocada
        let entries = ledger.recent(None, 10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].check_out, Some(out));
        assert_eq!(entries[0].check_out, Some(out2));
    }

    #[test]
    fn test_range_query_inclusive_bounds() {
        let mut ledger = HistoryLedger::new();
        ledger.open_entry(&record("AAA11111111111111", "2025-03-01 00:00"), 0);
        ledger.open_entry(&record("BBB22222222222222", "2025-03-03 23:59"), 0);
        ledger.open_entry(&record("CCC33333333333333", "2025-03-04 00:00"), 0);

        let from = validate_date("2025-03-01").unwrap();
        let to = validate_date("2025-03-03").unwrap();
        let hits = ledger.range_query(HistoryField::CheckIn, from, to);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].vin, "AAA11111111111111");
        assert_eq!(hits[1].vin, "BBB22222222222222");
    }

    #[test]
    fn test_range_query_on_checkout_skips_open_entries() {
        let mut ledger = HistoryLedger::new();
        ledger.open_entry(&record("AAA11111111111111", "2025-03-01 10:00"), 0);
        ledger.open_entry(&record("BBB22222222222222", "2025-03-01 11:00"), 1);
        let out = validate_minute("2025-03-02 09:00").unwrap();
        ledger.close_entry("BBB22222222222222", 1, out, fee());

        let from = validate_date("2025-03-01").unwrap();
        let to = validate_date("2025-03-09").unwrap();
        let hits = ledger.range_query(HistoryField::CheckOut, from, to);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].vin, "BBB22222222222222");
    }

    #[test]
    fn test_search_returns_most_recent_match() {
        let mut ledger = HistoryLedger::new();
        ledger.open_entry(&record("AAA11111111111111", "2025-03-01 08:00"), 0);
        ledger.open_entry(&record("AAA22222222222222", "2025-03-02 08:00"), 1);

        let found = ledger.search_by_identifier("aaa").unwrap();
        assert_eq!(found.vin, "AAA22222222222222");
    }

    #[test]
    fn test_recent_respects_limit() {
        let mut ledger = HistoryLedger::new();
        for n in 0..5 {
            ledger.open_entry(
                &record(&format!("{:017}", n), "2025-03-01 08:00"),
                0,
            );
        }
        assert_eq!(ledger.recent(None, 3).len(), 3);
        assert_eq!(ledger.recent(Some("00000000000000004"), 10).len(), 1);
    }
}
