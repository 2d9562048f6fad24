//! Formatos de fecha y hora del sistema
//!
//! Todo el sistema trabaja con resolución de minuto y sin zona horaria.
//! Los timestamps se persisten como `YYYY-MM-DD HH:MM`.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Formato de timestamp con resolución de minuto
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formato de fecha
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp actual truncado al minuto
pub fn now_minute() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// Formatear un timestamp con resolución de minuto
pub fn fmt_minute(value: &NaiveDateTime) -> String {
    value.format(MINUTE_FORMAT).to_string()
}

/// Último minuto del día indicado (23:59)
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 0)
        .expect("23:59 es una hora válida")
}

/// Serialización serde para `NaiveDateTime` en formato de minuto
pub mod minute {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::MINUTE_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(MINUTE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&value, MINUTE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serialización serde para `Option<NaiveDateTime>`.
///
/// Un valor ausente se persiste como cadena vacía, que es como el formato
/// externo representa una estancia todavía abierta.
pub mod minute_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::MINUTE_FORMAT;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&v.format(MINUTE_FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value.as_deref() {
            None => Ok(None),
            Some(v) if v.trim().is_empty() => Ok(None),
            Some(v) => NaiveDateTime::parse_from_str(v, MINUTE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
