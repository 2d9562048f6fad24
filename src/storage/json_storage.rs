//! Persistencia JSON de estado completo
//!
//! Dos archivos independientes: la tabla de ocupación y el historial. Cada
//! escritura usa el patrón write-rename: se escribe a `{path}.tmp`, se hace
//! `sync_all()` y se renombra sobre el archivo final, de modo que un crash a
//! mitad de escritura nunca deja el archivo persistido corrupto. Un archivo
//! ausente o ilegible al cargar se reemplaza por el estado vacío.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::config::environment::EnvironmentConfig;
use crate::state::Yard;
use crate::utils::errors::AppError;

#[derive(Debug, Clone)]
pub struct JsonStorage {
    data_file: PathBuf,
    history_file: PathBuf,
}

impl JsonStorage {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            data_file: PathBuf::from(&config.data_file),
            history_file: PathBuf::from(&config.history_file),
        }
    }

    /// Cargar el depósito completo desde disco
    pub fn load(&self) -> Yard {
        let mut yard = Yard {
            store: load_or_default(&self.data_file),
            ledger: load_or_default(&self.history_file),
        };
        yard.store.ensure_areas();
        yard
    }

    /// Persistir el depósito completo.
    /// Se invoca después de cada mutación exitosa, con la guarda de
    /// escritura todavía tomada.
    pub fn save(&self, yard: &Yard) -> Result<(), AppError> {
        atomic_write(&self.data_file, &serde_json::to_vec_pretty(&yard.store)?)?;
        atomic_write(&self.history_file, &serde_json::to_vec_pretty(&yard.ledger)?)?;
        Ok(())
    }
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("⚠️ Archivo '{}' ilegible, se usa estado vacío: {}", path.display(), e);
                T::default()
            }
        },
        Err(e) => {
            log::warn!("⚠️ No se pudo leer '{}': {}", path.display(), e);
            T::default()
        }
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::VehicleRecord;
    use crate::utils::timefmt::now_minute;
    use uuid::Uuid;

    fn test_config(name: &str) -> EnvironmentConfig {
        let dir = std::env::temp_dir().join(format!("depot_storage_test_{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        EnvironmentConfig {
            data_file: dir.join("data.json").to_string_lossy().into_owned(),
            history_file: dir.join("history.json").to_string_lossy().into_owned(),
            ..EnvironmentConfig::default()
        }
    }

    fn record(vin: &str) -> VehicleRecord {
        VehicleRecord {
            id: Uuid::new_v4(),
            vin: vin.to_string(),
            storage_code: "LK12345".to_string(),
            check_in: now_minute(),
            ready_date: Some("2025-03-05".to_string()),
            ready_time: None,
            notes: "llave en oficina".to_string(),
            extras: Vec::new(),
        }
    }

    #[test]
    fn test_load_missing_files_gives_empty_yard() {
        let storage = JsonStorage::new(&test_config("missing"));
        let yard = storage.load();
        assert_eq!(yard.store.total(), 0);
        assert!(yard.ledger.is_empty());
        assert_eq!(yard.store.zone_counts().len(), crate::config::AREAS);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let config = test_config("round_trip");
        let storage = JsonStorage::new(&config);

        let mut yard = storage.load();
        let r = record("WDB12345678901234");
        yard.ledger.open_entry(&r, 5);
        yard.store.add(5, r).unwrap();
        storage.save(&yard).unwrap();

        // no debe quedar archivo temporal
        assert!(!Path::new(&format!("{}.tmp", config.data_file.trim_end_matches(".json"))).exists());

        let reloaded = storage.load();
        assert_eq!(reloaded.store.total(), 1);
        let (zone, found) = reloaded.store.find_by_identifier("WDB").unwrap();
        assert_eq!(zone, 5);
        assert_eq!(found.notes, "llave en oficina");
        assert_eq!(reloaded.ledger.len(), 1);
        assert!(reloaded.ledger.search_by_identifier("WDB").unwrap().is_open());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let config = test_config("corrupt");
        fs::write(&config.data_file, "{ esto no es json").unwrap();
        let storage = JsonStorage::new(&config);
        let yard = storage.load();
        assert_eq!(yard.store.total(), 0);
    }
}
