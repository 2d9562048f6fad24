//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas las variables tienen valores por defecto razonables para desarrollo.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::fees::FeeConfig;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub host: String,
    pub port: u16,
    pub data_file: String,
    pub history_file: String,
    pub ocr_api_url: String,
    pub ocr_api_key: String,
    pub fees: FeeConfig,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            data_file: env::var("DATA_FILE").unwrap_or_else(|_| "data.json".to_string()),
            history_file: env::var("HISTORY_FILE")
                .unwrap_or_else(|_| "history.json".to_string()),
            ocr_api_url: env::var("OCR_API_URL")
                .unwrap_or_else(|_| "https://api.ocr.space/parse/image".to_string()),
            // "helloworld" es la clave pública de prueba de OCR.space
            ocr_api_key: env::var("OCR_API_KEY").unwrap_or_else(|_| "helloworld".to_string()),
            fees: FeeConfig {
                grace_period_days: env_or("FEE_GRACE_PERIOD_DAYS", 7),
                base_fee: env_or("FEE_BASE", Decimal::new(2500, 2)),
                daily_rate: env_or("FEE_DAILY_RATE", Decimal::new(1500, 2)),
            },
        }
    }
}

impl EnvironmentConfig {
    /// Obtener la dirección del servidor
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
