//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. La tabla de ocupación y el historial forman
//! una única unidad de estado bajo un mismo lock: toda mutación toma la
//! guarda de escritura, muta y persiste antes de soltarla.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::environment::EnvironmentConfig;
use crate::models::history::HistoryLedger;
use crate::models::occupancy::OccupancyStore;
use crate::services::extraction::IdentifierExtractor;
use crate::services::fees::FeeCalculator;
use crate::services::recognition::RecognitionClient;
use crate::storage::json_storage::JsonStorage;

/// Unidad de estado del depósito: ocupación + historial
#[derive(Debug, Default)]
pub struct Yard {
    pub store: OccupancyStore,
    pub ledger: HistoryLedger,
}

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub yard: Arc<RwLock<Yard>>,
    pub storage: JsonStorage,
    pub extractor: IdentifierExtractor,
    pub fees: FeeCalculator,
    pub recognition: RecognitionClient,
}

impl AppState {
    /// Construir el estado cargando el depósito desde disco una sola vez
    pub fn new(config: EnvironmentConfig) -> Self {
        let storage = JsonStorage::new(&config);
        let yard = storage.load();
        let fees = FeeCalculator::new(config.fees.clone());
        let recognition = RecognitionClient::new(&config);

        Self {
            config,
            yard: Arc::new(RwLock::new(yard)),
            storage,
            extractor: IdentifierExtractor::new(),
            fees,
            recognition,
        }
    }
}
