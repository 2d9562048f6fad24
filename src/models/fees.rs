//! Tipos del cálculo de tarifas
//!
//! El desglose de tarifa es un valor consultivo mientras el vehículo está
//! almacenado y se congela como snapshot en el historial al momento de la
//! salida.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Estado de la estancia respecto a la fecha de preparación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    /// Sin fecha de preparación registrada
    NoAppointment,
    /// Fecha de preparación malformada; el cálculo degrada a cero sin fallar
    Error,
    /// Dentro del período de gracia
    WithinGracePeriod,
    /// Hasta 3 días de retraso
    MildlyOverdue,
    /// Hasta 7 días de retraso
    Overdue,
    /// Más de 7 días de retraso
    SeverelyOverdue,
}

/// Desglose completo de la tarifa de una estancia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub status: FeeStatus,
    pub overdue_days: i64,
    pub base_fee: Decimal,
    pub daily_fee_total: Decimal,
    pub total_fee: Decimal,
    pub extras_total: Decimal,
    pub grand_total: Decimal,
}

impl FeeBreakdown {
    /// Desglose sin cargos por retraso; el gran total son solo los extras.
    pub fn without_fees(status: FeeStatus, extras_total: Decimal) -> Self {
        Self {
            status,
            overdue_days: 0,
            base_fee: Decimal::ZERO,
            daily_fee_total: Decimal::ZERO,
            total_fee: Decimal::ZERO,
            extras_total,
            grand_total: extras_total,
        }
    }
}

/// Configuración del motor de tarifas
#[derive(Debug, Clone)]
pub struct FeeConfig {
    /// Días de gracia desde la fecha de preparación
    pub grace_period_days: i64,
    /// Cargo fijo al entrar en mora
    pub base_fee: Decimal,
    /// Cargo por cada día de retraso
    pub daily_rate: Decimal,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            grace_period_days: 7,
            base_fee: Decimal::new(2500, 2),
            daily_rate: Decimal::new(1500, 2),
        }
    }
}
