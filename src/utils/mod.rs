//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y formatos de fecha/hora comunes.

pub mod errors;
pub mod timefmt;
pub mod validation;
