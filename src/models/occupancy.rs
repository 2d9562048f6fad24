//! Tabla de ocupación por zonas
//!
//! Este módulo mantiene el conjunto de vehículos actualmente almacenados,
//! particionado en una tabla fija de zonas indexadas por entero. Hace cumplir
//! dos invariantes: el VIN es único entre los vehículos almacenados y el
//! total agregado nunca supera `MAX_CAPACITY`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AREAS, MAX_CAPACITY};
use crate::models::vehicle::VehicleRecord;
use crate::utils::errors::AppError;

/// Vehículos almacenados, una lista ordenada por inserción por zona
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupancyStore {
    zones: Vec<Vec<VehicleRecord>>,
}

impl Default for OccupancyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OccupancyStore {
    pub fn new() -> Self {
        Self {
            zones: vec![Vec::new(); AREAS],
        }
    }

    /// Completar zonas faltantes tras cargar un archivo viejo o dañado
    pub fn ensure_areas(&mut self) {
        if self.zones.len() < AREAS {
            self.zones.resize_with(AREAS, Vec::new);
        }
    }

    /// Total de vehículos almacenados en todas las zonas
    pub fn total(&self) -> usize {
        self.zones.iter().map(|z| z.len()).sum()
    }

    /// Cantidad de vehículos por zona, en orden de índice
    pub fn zone_counts(&self) -> Vec<usize> {
        self.zones.iter().map(|z| z.len()).collect()
    }

    fn check_zone(&self, zone: usize) -> Result<(), AppError> {
        if zone >= self.zones.len() {
            return Err(AppError::Validation(format!(
                "Zona inválida {} (se espera un índice entre 0 y {})",
                zone,
                self.zones.len() - 1
            )));
        }
        Ok(())
    }

    /// Ingresar un vehículo a una zona.
    ///
    /// Falla con `Validation` si la zona no existe, con `Conflict` si el VIN
    /// ya está almacenado y con `Conflict` si el depósito está lleno. El
    /// orden de los chequeos es fijo: zona, duplicado, capacidad.
    pub fn add(&mut self, zone: usize, record: VehicleRecord) -> Result<(), AppError> {
        self.check_zone(zone)?;

        if self.contains_vin(&record.vin) {
            return Err(AppError::Conflict(format!(
                "El VIN '{}' ya está almacenado",
                record.vin
            )));
        }

        if self.total() >= MAX_CAPACITY {
            return Err(AppError::Conflict(format!(
                "Capacidad del depósito alcanzada ({} vehículos)",
                MAX_CAPACITY
            )));
        }

        self.zones[zone].push(record);
        Ok(())
    }

    /// Retirar un vehículo por id, devolviendo su zona y el registro
    pub fn remove(&mut self, id: Uuid) -> Result<(usize, VehicleRecord), AppError> {
        for (zone, records) in self.zones.iter_mut().enumerate() {
            if let Some(pos) = records.iter().position(|r| r.id == id) {
                return Ok((zone, records.remove(pos)));
            }
        }
        Err(AppError::NotFound(format!(
            "No hay ningún vehículo almacenado con id '{}'",
            id
        )))
    }

    /// Mover un vehículo a otra zona.
    ///
    /// La reubicación ocurre bajo la misma referencia mutable: ningún
    /// observador externo puede ver el registro ausente de ambas zonas ni
    /// presente en ambas. Devuelve la zona de origen.
    pub fn relocate(&mut self, id: Uuid, target_zone: usize) -> Result<usize, AppError> {
        self.check_zone(target_zone)?;
        let (from_zone, record) = self.remove(id)?;
        self.zones[target_zone].push(record);
        Ok(from_zone)
    }

    /// Buscar un vehículo por id
    pub fn find_by_id(&self, id: Uuid) -> Option<(usize, &VehicleRecord)> {
        self.iter().find(|(_, r)| r.id == id)
    }

    /// Buscar el primer vehículo cuyo VIN o código de almacén contenga la
    /// consulta. Las zonas se recorren en orden ascendente y los registros en
    /// orden de inserción; gana el primer match, sin ranking.
    pub fn find_by_identifier(&self, query: &str) -> Option<(usize, &VehicleRecord)> {
        let query = query.trim().to_uppercase();
        if query.is_empty() {
            return None;
        }
        self.iter().find(|(_, r)| r.matches_identifier(&query))
    }

    /// Recorrer todos los registros como (zona, registro)
    pub fn iter(&self) -> impl Iterator<Item = (usize, &VehicleRecord)> {
        self.zones
            .iter()
            .enumerate()
            .flat_map(|(zone, records)| records.iter().map(move |r| (zone, r)))
    }

    fn contains_vin(&self, vin: &str) -> bool {
        self.iter().any(|(_, r)| r.vin == vin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::timefmt::now_minute;

    fn record(vin: &str, storage_code: &str) -> VehicleRecord {
        VehicleRecord {
            id: Uuid::new_v4(),
            vin: vin.to_string(),
            storage_code: storage_code.to_string(),
            check_in: now_minute(),
            ready_date: None,
            ready_time: None,
            notes: String::new(),
            extras: Vec::new(),
        }
    }

    fn vin(n: usize) -> String {
        format!("{:017}", n)
    }

    #[test]
    fn test_add_and_find_by_identifier() {
        let mut store = OccupancyStore::new();
        store.add(3, record("WDB12345678901234", "LK12345")).unwrap();

        let (zone, found) = store.find_by_identifier("WDB12345678901234").unwrap();
        assert_eq!(zone, 3);
        assert_eq!(found.storage_code, "LK12345");

        // también por código de almacén, case-insensitive y por substring
        let (zone, _) = store.find_by_identifier("lk123").unwrap();
        assert_eq!(zone, 3);
    }

    #[test]
    fn test_add_invalid_zone() {
        let mut store = OccupancyStore::new();
        let err = store.add(AREAS, record("WDB12345678901234", "LK12345"));
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_add_duplicate_vin_conflict() {
        let mut store = OccupancyStore::new();
        store.add(0, record("WDB12345678901234", "LK11111")).unwrap();
        let err = store.add(5, record("WDB12345678901234", "LK22222"));
        assert!(matches!(err, Err(AppError::Conflict(_))));
        assert_eq!(store.total(), 1);
    }

    #[test]
    fn test_capacity_bound() {
        let mut store = OccupancyStore::new();
        for n in 0..MAX_CAPACITY {
            store
                .add(n % AREAS, record(&vin(n), "LK12345"))
                .unwrap();
        }
        assert_eq!(store.total(), MAX_CAPACITY);

        let err = store.add(0, record(&vin(MAX_CAPACITY), "LK99999"));
        assert!(matches!(err, Err(AppError::Conflict(_))));
        assert_eq!(store.total(), MAX_CAPACITY);
    }

    #[test]
    fn test_remove_twice_not_found() {
        let mut store = OccupancyStore::new();
        let r = record("WDB12345678901234", "LK12345");
        let id = r.id;
        store.add(2, r).unwrap();

        let (zone, removed) = store.remove(id).unwrap();
        assert_eq!(zone, 2);
        assert_eq!(removed.id, id);

        assert!(matches!(store.remove(id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_relocate_moves_between_zones() {
        let mut store = OccupancyStore::new();
        let r = record("WDB12345678901234", "LK12345");
        let id = r.id;
        store.add(2, r).unwrap();

        let from = store.relocate(id, 5).unwrap();
        assert_eq!(from, 2);

        let (zone, _) = store.find_by_id(id).unwrap();
        assert_eq!(zone, 5);
        assert_eq!(store.zone_counts()[2], 0);
        assert_eq!(store.zone_counts()[5], 1);
        assert_eq!(store.total(), 1);
    }

    #[test]
    fn test_relocate_invalid_target() {
        let mut store = OccupancyStore::new();
        let r = record("WDB12345678901234", "LK12345");
        let id = r.id;
        store.add(2, r).unwrap();

        assert!(matches!(
            store.relocate(id, AREAS),
            Err(AppError::Validation(_))
        ));
        // el registro sigue en su zona original
        assert_eq!(store.find_by_id(id).unwrap().0, 2);
    }

    #[test]
    fn test_first_match_wins_in_zone_order() {
        let mut store = OccupancyStore::new();
        store.add(7, record("AAA11111111111111", "LK11111")).unwrap();
        store.add(1, record("AAA22222222222222", "LK22222")).unwrap();

        // ambos VIN contienen "AAA"; gana la zona de índice menor
        let (zone, found) = store.find_by_identifier("AAA").unwrap();
        assert_eq!(zone, 1);
        assert_eq!(found.vin, "AAA22222222222222");
    }

    #[test]
    fn test_ensure_areas_pads_missing_zones() {
        let mut store: OccupancyStore = serde_json::from_str("[[]]").unwrap();
        store.ensure_areas();
        assert_eq!(store.zone_counts().len(), AREAS);
    }
}
