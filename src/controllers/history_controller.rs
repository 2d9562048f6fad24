use crate::dto::history_dto::HistoryEntryResponse;
use crate::models::history::HistoryField;
use crate::services::export::{self, CsvExport};
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::validate_date;

/// Tope de resultados del listado de historial
const HISTORY_PAGE_LIMIT: usize = 200;

pub struct HistoryController {
    state: AppState,
}

impl HistoryController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn recent(&self, query: Option<String>) -> Vec<HistoryEntryResponse> {
        let yard = self.state.yard.read().await;
        yard.ledger
            .recent(query.as_deref(), HISTORY_PAGE_LIMIT)
            .into_iter()
            .map(HistoryEntryResponse::from)
            .collect()
    }

    pub async fn export_range(
        &self,
        field: HistoryField,
        from: &str,
        to: &str,
    ) -> AppResult<CsvExport> {
        let from_date = validate_date(from)?;
        let to_date = validate_date(to)?;

        let yard = self.state.yard.read().await;
        let entries = yard.ledger.range_query(field, from_date, to_date);

        let label = match field {
            HistoryField::CheckIn => "entradas",
            HistoryField::CheckOut => "salidas",
        };
        export::history_csv(&entries, label, from.trim(), to.trim())
    }
}
