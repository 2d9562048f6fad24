//! Generación de exports CSV
//!
//! Consumidores de solo lectura de la tabla de ocupación y el historial.
//! El formato usa punto y coma como separador, que es lo que esperan las
//! planillas del lado administrativo.

use chrono::NaiveDateTime;

use crate::models::history::HistoryEntry;
use crate::models::occupancy::OccupancyStore;
use crate::utils::errors::{internal_error, AppError};
use crate::utils::timefmt::fmt_minute;

/// Un archivo CSV listo para descargar
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

fn write_rows(rows: Vec<Vec<String>>) -> Result<String, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| internal_error(&format!("Error escribiendo CSV: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| internal_error(&format!("Error finalizando CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| internal_error(&format!("CSV no es UTF-8: {}", e)))
}

/// Export de todos los vehículos actualmente almacenados
pub fn current_vehicles_csv(
    store: &OccupancyStore,
    generated_at: NaiveDateTime,
) -> Result<CsvExport, AppError> {
    let mut rows = vec![vec![
        "VIN".to_string(),
        "Código de almacén".to_string(),
        "Zona".to_string(),
        "Entrada".to_string(),
        "Fecha de preparación".to_string(),
        "Hora de preparación".to_string(),
        "Notas".to_string(),
    ]];

    for (zone, record) in store.iter() {
        rows.push(vec![
            record.vin.clone(),
            record.storage_code.clone(),
            (zone + 1).to_string(),
            fmt_minute(&record.check_in),
            record.ready_date.clone().unwrap_or_default(),
            record.ready_time.clone().unwrap_or_default(),
            record.notes.clone(),
        ]);
    }

    Ok(CsvExport {
        filename: format!(
            "deposito_actual_{}.csv",
            generated_at.format("%Y%m%d_%H%M")
        ),
        content: write_rows(rows)?,
    })
}

/// Export de entradas del historial ya filtradas por rango de fechas
pub fn history_csv(
    entries: &[&HistoryEntry],
    label: &str,
    from: &str,
    to: &str,
) -> Result<CsvExport, AppError> {
    let mut rows = vec![vec![
        "VIN".to_string(),
        "Código de almacén".to_string(),
        "Zona".to_string(),
        "Entrada".to_string(),
        "Salida".to_string(),
    ]];

    for entry in entries {
        rows.push(vec![
            entry.vin.clone(),
            entry.storage_code.clone(),
            entry.zone_in.to_string(),
            fmt_minute(&entry.check_in),
            entry.check_out.as_ref().map(fmt_minute).unwrap_or_default(),
        ]);
    }

    Ok(CsvExport {
        filename: format!("historial_{}_{}_a_{}.csv", label, from, to),
        content: write_rows(rows)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::VehicleRecord;
    use crate::utils::validation::validate_minute;
    use uuid::Uuid;

    #[test]
    fn test_current_vehicles_csv_layout() {
        let mut store = OccupancyStore::new();
        store
            .add(
                2,
                VehicleRecord {
                    id: Uuid::new_v4(),
                    vin: "WDB12345678901234".to_string(),
                    storage_code: "LK12345".to_string(),
                    check_in: validate_minute("2025-03-01 10:30").unwrap(),
                    ready_date: Some("2025-03-05".to_string()),
                    ready_time: Some("14:00".to_string()),
                    notes: "sin daños".to_string(),
                    extras: Vec::new(),
                },
            )
            .unwrap();

        let export =
            current_vehicles_csv(&store, validate_minute("2025-03-02 08:00").unwrap()).unwrap();
        assert_eq!(export.filename, "deposito_actual_20250302_0800.csv");

        let mut lines = export.content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "VIN;Código de almacén;Zona;Entrada;Fecha de preparación;Hora de preparación;Notas"
        );
        // la zona se exporta 1-based
        assert_eq!(
            lines.next().unwrap(),
            "WDB12345678901234;LK12345;3;2025-03-01 10:30;2025-03-05;14:00;sin daños"
        );
    }

    #[test]
    fn test_history_csv_open_entry_has_empty_checkout() {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            vin: "WDB12345678901234".to_string(),
            storage_code: "LK12345".to_string(),
            zone_in: 3,
            check_in: validate_minute("2025-03-01 10:30").unwrap(),
            zone_out: None,
            check_out: None,
            ready_date: None,
            ready_time: None,
            fee: None,
        };

        let export = history_csv(&[&entry], "entradas", "2025-03-01", "2025-03-02").unwrap();
        assert_eq!(export.filename, "historial_entradas_2025-03-01_a_2025-03-02.csv");
        let mut lines = export.content.lines();
        lines.next();
        assert_eq!(
            lines.next().unwrap(),
            "WDB12345678901234;LK12345;3;2025-03-01 10:30;"
        );
    }
}
