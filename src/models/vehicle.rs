//! Modelo de registro de vehículo
//!
//! Un `VehicleRecord` representa un vehículo actualmente almacenado en el
//! depósito. El registro pertenece exactamente a una zona de la tabla de
//! ocupación; la zona no se duplica dentro del registro.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::timefmt;

/// Cargo adicional capturado de las notas al momento del ingreso.
///
/// Se deriva una sola vez al crear el registro y queda congelado; ediciones
/// posteriores de las notas no lo recalculan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extra {
    pub description: String,
    pub cost: Decimal,
    pub date: NaiveDate,
}

/// Vehículo actualmente almacenado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: Uuid,
    pub vin: String,
    pub storage_code: String,
    #[serde(with = "timefmt::minute")]
    pub check_in: NaiveDateTime,
    #[serde(default)]
    pub ready_date: Option<String>,
    #[serde(default)]
    pub ready_time: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub extras: Vec<Extra>,
}

impl VehicleRecord {
    /// Match por substring contra VIN o código de almacén.
    /// `query` debe venir ya en mayúsculas.
    pub fn matches_identifier(&self, query: &str) -> bool {
        self.vin.contains(query) || self.storage_code.contains(query)
    }
}
