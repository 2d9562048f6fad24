//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{NaiveDate, NaiveDateTime};

use crate::utils::errors::AppError;
use crate::utils::timefmt::{DATE_FORMAT, MINUTE_FORMAT};

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AppError::Validation(format!(
            "Fecha inválida '{}' (se espera YYYY-MM-DD)",
            value
        ))
    })
}

/// Validar y convertir string a timestamp con resolución de minuto
pub fn validate_minute(value: &str) -> Result<NaiveDateTime, AppError> {
    NaiveDateTime::parse_from_str(value.trim(), MINUTE_FORMAT).map_err(|_| {
        AppError::Validation(format!(
            "Timestamp inválido '{}' (se espera YYYY-MM-DD HH:MM)",
            value
        ))
    })
}

/// Validar que un índice de zona esté dentro del rango permitido
pub fn validate_zone_index(value: i64, areas: usize) -> Result<usize, AppError> {
    if value < 0 || value >= areas as i64 {
        return Err(AppError::Validation(format!(
            "Zona inválida {} (se espera un índice entre 0 y {})",
            value,
            areas - 1
        )));
    }
    Ok(value as usize)
}
