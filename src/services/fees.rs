//! Motor de tarifas por retraso
//!
//! Calcula el estado de mora y los totales monetarios de una estancia a
//! partir de la fecha de preparación programada. El cálculo es consultivo:
//! una fecha malformada degrada a un desglose en cero con estado `Error` y
//! nunca bloquea una operación de mutación.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;

use crate::models::fees::{FeeBreakdown, FeeConfig, FeeStatus};
use crate::models::vehicle::Extra;
use crate::utils::timefmt::DATE_FORMAT;

/// Calculadora de tarifas con su configuración y regex precompilada
#[derive(Debug, Clone)]
pub struct FeeCalculator {
    config: FeeConfig,
    extra_re: Regex,
}

impl Default for FeeCalculator {
    fn default() -> Self {
        Self::new(FeeConfig::default())
    }
}

impl FeeCalculator {
    pub fn new(config: FeeConfig) -> Self {
        // primer token numérico seguido de un marcador de moneda, ej. "120,50 €"
        let extra_re = Regex::new(r"(?i)(\d+(?:[.,]\d{1,2})?)\s*(?:€|EUR)").unwrap();
        Self { config, extra_re }
    }

    /// Calcular el desglose de tarifa de una estancia.
    ///
    /// `ready_date` es la fecha de preparación tal como fue ingresada; los
    /// días de retraso se cuentan en días enteros entre esa fecha y `as_of`.
    pub fn calculate(
        &self,
        ready_date: Option<&str>,
        extras: &[Extra],
        as_of: NaiveDateTime,
    ) -> FeeBreakdown {
        let extras_total: Decimal = extras.iter().map(|e| e.cost).sum();

        let raw = match ready_date.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw,
            None => return FeeBreakdown::without_fees(FeeStatus::NoAppointment, extras_total),
        };

        let ready = match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => date,
            // fail-soft: la tarifa nunca bloquea la operación que la consulta
            Err(_) => return FeeBreakdown::without_fees(FeeStatus::Error, extras_total),
        };

        let elapsed = as_of.date().signed_duration_since(ready).num_days();
        if elapsed <= self.config.grace_period_days {
            return FeeBreakdown::without_fees(FeeStatus::WithinGracePeriod, extras_total);
        }

        let overdue_days = elapsed - self.config.grace_period_days;
        let daily_fee_total = Decimal::from(overdue_days) * self.config.daily_rate;
        let total_fee = self.config.base_fee + daily_fee_total;

        let status = if overdue_days <= 3 {
            FeeStatus::MildlyOverdue
        } else if overdue_days <= 7 {
            FeeStatus::Overdue
        } else {
            FeeStatus::SeverelyOverdue
        };

        FeeBreakdown {
            status,
            overdue_days,
            base_fee: self.config.base_fee,
            daily_fee_total,
            total_fee,
            extras_total,
            grand_total: total_fee + extras_total,
        }
    }

    /// Derivar cargos extra del texto de notas.
    ///
    /// Se captura únicamente el primer token numérico seguido de un marcador
    /// de moneda; si existe, produce un único `Extra` fechado en `date` con
    /// las notas completas como descripción. Se calcula una sola vez al crear
    /// el registro y no se vuelve a evaluar.
    pub fn derive_extras(&self, notes: &str, date: NaiveDate) -> Vec<Extra> {
        let Some(caps) = self.extra_re.captures(notes) else {
            return Vec::new();
        };
        let raw = caps[1].replace(',', ".");
        match raw.parse::<Decimal>() {
            Ok(cost) => vec![Extra {
                description: notes.trim().to_string(),
                cost,
                date,
            }],
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::{validate_date, validate_minute};

    fn calculator() -> FeeCalculator {
        FeeCalculator::new(FeeConfig {
            grace_period_days: 7,
            base_fee: Decimal::new(2500, 2),
            daily_rate: Decimal::new(1500, 2),
        })
    }

    fn extra(cost: &str) -> Extra {
        Extra {
            description: "lavado".to_string(),
            cost: cost.parse().unwrap(),
            date: validate_date("2025-03-01").unwrap(),
        }
    }

    #[test]
    fn test_no_ready_date_sums_only_extras() {
        let calc = calculator();
        let as_of = validate_minute("2025-03-10 12:00").unwrap();
        let result = calc.calculate(None, &[extra("40.00")], as_of);
        assert_eq!(result.status, FeeStatus::NoAppointment);
        assert_eq!(result.total_fee, Decimal::ZERO);
        assert_eq!(result.grand_total, Decimal::new(4000, 2));

        // cadena vacía equivale a no tener cita
        let result = calc.calculate(Some("  "), &[], as_of);
        assert_eq!(result.status, FeeStatus::NoAppointment);
        assert_eq!(result.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_malformed_ready_date_fails_soft() {
        let calc = calculator();
        let as_of = validate_minute("2025-03-10 12:00").unwrap();
        let result = calc.calculate(Some("10.03.2025"), &[extra("12.50")], as_of);
        assert_eq!(result.status, FeeStatus::Error);
        assert_eq!(result.total_fee, Decimal::ZERO);
        assert_eq!(result.grand_total, Decimal::new(1250, 2));
    }

    #[test]
    fn test_within_grace_period_no_fee() {
        let calc = calculator();
        let as_of = validate_minute("2025-03-08 23:59").unwrap();
        // exactamente 7 días transcurridos, el límite de la gracia
        let result = calc.calculate(Some("2025-03-01"), &[], as_of);
        assert_eq!(result.status, FeeStatus::WithinGracePeriod);
        assert_eq!(result.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_one_day_overdue_is_mild() {
        let calc = calculator();
        // fecha de preparación 8 días antes de la evaluación
        let as_of = validate_minute("2025-03-09 10:00").unwrap();
        let result = calc.calculate(Some("2025-03-01"), &[], as_of);
        assert_eq!(result.status, FeeStatus::MildlyOverdue);
        assert_eq!(result.overdue_days, 1);
        assert_eq!(result.daily_fee_total, Decimal::new(1500, 2));
        // totalFee = baseFee + dailyRate
        assert_eq!(result.total_fee, Decimal::new(4000, 2));
        assert_eq!(result.grand_total, Decimal::new(4000, 2));
    }

    #[test]
    fn test_status_tiers() {
        let calc = calculator();
        let ready = Some("2025-03-01");

        // 3 días de retraso sigue siendo leve
        let as_of = validate_minute("2025-03-11 00:00").unwrap();
        assert_eq!(calc.calculate(ready, &[], as_of).status, FeeStatus::MildlyOverdue);

        // 4 días pasa a Overdue
        let as_of = validate_minute("2025-03-12 00:00").unwrap();
        assert_eq!(calc.calculate(ready, &[], as_of).status, FeeStatus::Overdue);

        // 7 días sigue en Overdue
        let as_of = validate_minute("2025-03-15 00:00").unwrap();
        assert_eq!(calc.calculate(ready, &[], as_of).status, FeeStatus::Overdue);

        // 8 días es severo
        let as_of = validate_minute("2025-03-16 00:00").unwrap();
        let result = calc.calculate(ready, &[], as_of);
        assert_eq!(result.status, FeeStatus::SeverelyOverdue);
        assert_eq!(result.overdue_days, 8);
        // 25.00 + 8 × 15.00
        assert_eq!(result.total_fee, Decimal::new(14500, 2));
    }

    #[test]
    fn test_calculate_is_idempotent() {
        let calc = calculator();
        let as_of = validate_minute("2025-03-20 15:30").unwrap();
        let extras = [extra("33.10")];
        let first = calc.calculate(Some("2025-03-01"), &extras, as_of);
        let second = calc.calculate(Some("2025-03-01"), &extras, as_of);
        assert_eq!(first, second);
    }

    #[test]
    fn test_derive_extras_first_currency_token() {
        let calc = calculator();
        let date = validate_date("2025-03-01").unwrap();

        let extras = calc.derive_extras("daños en paragolpes 120,50 € y 30 € de lavado", date);
        assert_eq!(extras.len(), 1);
        assert_eq!(extras[0].cost, Decimal::new(12050, 2));
        assert_eq!(
            extras[0].description,
            "daños en paragolpes 120,50 € y 30 € de lavado"
        );
        assert_eq!(extras[0].date, date);

        let extras = calc.derive_extras("transporte 45 EUR", date);
        assert_eq!(extras.len(), 1);
        assert_eq!(extras[0].cost, Decimal::from(45));
    }

    #[test]
    fn test_derive_extras_without_marker_is_empty() {
        let calc = calculator();
        let date = validate_date("2025-03-01").unwrap();
        assert!(calc.derive_extras("sin cargos", date).is_empty());
        assert!(calc.derive_extras("120 sin moneda", date).is_empty());
        assert!(calc.derive_extras("", date).is_empty());
    }
}
