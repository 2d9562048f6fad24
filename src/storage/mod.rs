//! Persistencia del estado
//!
//! El estado completo se serializa a dos documentos JSON después de cada
//! mutación exitosa; no hay persistencia incremental.

pub mod json_storage;
