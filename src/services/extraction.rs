//! Extracción y validación de identificadores
//!
//! Valida VIN y códigos de almacén ingresados por el usuario y extrae ambos
//! de texto libre producido por el colaborador externo de reconocimiento.

use regex::Regex;
use serde::Serialize;

use crate::utils::errors::AppError;

/// Identificadores encontrados en un bloque de texto.
/// Cada campo es opcional: los dos escaneos son independientes.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ExtractedIdentifiers {
    pub vin: Option<String>,
    pub storage_code: Option<String>,
}

/// Validador y extractor de identificadores con sus regex precompiladas
#[derive(Debug, Clone)]
pub struct IdentifierExtractor {
    vin_exact: Regex,
    vin_find: Regex,
    storage_exact: Regex,
    storage_find: Regex,
}

impl Default for IdentifierExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierExtractor {
    pub fn new() -> Self {
        // VIN: 17 caracteres, dígitos y A-Z sin I, O ni Q
        let vin_exact = Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap();
        let vin_find = Regex::new(r"[A-HJ-NPR-Z0-9]{17}").unwrap();
        // Código de almacén: dos letras seguidas de cinco dígitos, ej. LK12345
        let storage_exact = Regex::new(r"[A-Z]{2}\d{5}").unwrap();
        let storage_find = Regex::new(r"\b[A-Z]{2}\d{5}\b").unwrap();

        Self {
            vin_exact,
            vin_find,
            storage_exact,
            storage_find,
        }
    }

    /// Normalizar y validar un VIN.
    ///
    /// Mayúsculas y trim; acepta únicamente 17 caracteres del alfabeto
    /// permitido, sin extraer substrings.
    pub fn validate_vin(&self, raw: &str) -> Result<String, AppError> {
        let value = raw.trim().to_uppercase();
        if self.vin_exact.is_match(&value) {
            Ok(value)
        } else {
            Err(AppError::Validation(format!(
                "VIN inválido '{}' (se esperan 17 caracteres, sin I, O ni Q)",
                raw.trim()
            )))
        }
    }

    /// Normalizar y validar un código de almacén.
    ///
    /// Mayúsculas, se descartan espacios y guiones, y se toma el primer
    /// substring con forma de código (dos letras y cinco dígitos).
    pub fn validate_storage_code(&self, raw: &str) -> Result<String, AppError> {
        let cleaned: String = raw
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        self.storage_exact
            .find(&cleaned)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Código de almacén inválido '{}' (se espera LK12345)",
                    raw.trim()
                ))
            })
    }

    /// Extraer VIN y código de almacén de texto libre.
    ///
    /// Dos escaneos independientes sobre el texto en mayúsculas; para cada
    /// campo gana el primer match de izquierda a derecha, sin ranking por
    /// confianza ni validación cruzada entre ambos. Si no aparece ninguno de
    /// los dos, falla con `Extraction`.
    pub fn extract_from_text(&self, text: &str) -> Result<ExtractedIdentifiers, AppError> {
        let upper = text.to_uppercase();

        let vin = self
            .vin_find
            .find(&upper)
            .and_then(|m| self.validate_vin(m.as_str()).ok());

        let storage_code = self
            .storage_find
            .find(&upper)
            .and_then(|m| self.validate_storage_code(m.as_str()).ok());

        if vin.is_none() && storage_code.is_none() {
            return Err(AppError::Extraction(
                "No se encontró ningún VIN ni código de almacén en el texto".to_string(),
            ));
        }

        Ok(ExtractedIdentifiers { vin, storage_code })
    }
}
