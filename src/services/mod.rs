//! Servicios del sistema
//!
//! Extracción de identificadores, motor de tarifas, cliente del servicio
//! externo de reconocimiento de texto y generación de exports CSV.

pub mod export;
pub mod extraction;
pub mod fees;
pub mod recognition;
