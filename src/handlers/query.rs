// src/handlers/query.rs
use serde::Deserialize;
use std::ops::RangeInclusive;

use crate::models::ValuationInputs;
use crate::services::valuation::{Result, ValuationError};

const YEARS_RANGE: RangeInclusive<usize> = 3..=10;
const WACC_RANGE: RangeInclusive<f64> = 1.0..=20.0;
const TERMINAL_GROWTH_RANGE: RangeInclusive<f64> = 0.0..=6.0;
const FCFF_RANGE: RangeInclusive<f64> = 100.0..=10000.0;
const FCFF_GROWTH_RANGE: RangeInclusive<f64> = 0.0..=20.0;
const MARKET_CAP_RANGE: RangeInclusive<f64> = 100.0..=50000.0;

/// Dashboard controls as query parameters. Rates are given in percent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValuationQuery {
    pub forecast_years: usize,
    pub wacc_pct: f64,
    pub terminal_growth_pct: f64,
    pub initial_fcff: f64,
    pub fcff_growth_pct: f64,
    pub market_cap: f64,
}

impl Default for ValuationQuery {
    fn default() -> Self {
        ValuationQuery {
            forecast_years: 5,
            wacc_pct: 10.0,
            terminal_growth_pct: 2.0,
            initial_fcff: 1000.0,
            fcff_growth_pct: 5.0,
            market_cap: 15000.0,
        }
    }
}

fn check_range<T: PartialOrd + std::fmt::Display>(name: &str, value: T, range: RangeInclusive<T>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValuationError::InvalidInput(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

impl ValuationQuery {
    pub fn to_inputs(&self) -> Result<ValuationInputs> {
        check_range("forecast_years", self.forecast_years, YEARS_RANGE)?;
        check_range("wacc_pct", self.wacc_pct, WACC_RANGE)?;
        check_range("terminal_growth_pct", self.terminal_growth_pct, TERMINAL_GROWTH_RANGE)?;
        check_range("initial_fcff", self.initial_fcff, FCFF_RANGE)?;
        check_range("fcff_growth_pct", self.fcff_growth_pct, FCFF_GROWTH_RANGE)?;
        check_range("market_cap", self.market_cap, MARKET_CAP_RANGE)?;

        ValuationInputs::new(
            self.forecast_years,
            self.wacc_pct / 100.0,
            self.terminal_growth_pct / 100.0,
            self.initial_fcff,
            self.fcff_growth_pct / 100.0,
            self.market_cap,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_controls() {
        let inputs = ValuationQuery::default().to_inputs().unwrap();
        assert_eq!(inputs.forecast_years, 5);
        assert!((inputs.wacc - 0.10).abs() < 1e-12);
        assert!((inputs.terminal_growth - 0.02).abs() < 1e-12);
        assert!((inputs.fcff_growth - 0.05).abs() < 1e-12);
        assert_eq!(inputs.initial_fcff, 1000.0);
        assert_eq!(inputs.market_cap, 15000.0);
    }

    #[test]
    fn rejects_out_of_range_controls() {
        let too_long = ValuationQuery { forecast_years: 11, ..Default::default() };
        assert!(too_long.to_inputs().is_err());

        let tiny_cap = ValuationQuery { market_cap: 50.0, ..Default::default() };
        assert!(tiny_cap.to_inputs().is_err());

        let nan_wacc = ValuationQuery { wacc_pct: f64::NAN, ..Default::default() };
        assert!(nan_wacc.to_inputs().is_err());
    }

    #[test]
    fn rejects_wacc_at_terminal_growth() {
        let query = ValuationQuery {
            wacc_pct: 3.0,
            terminal_growth_pct: 3.0,
            ..Default::default()
        };
        match query.to_inputs() {
            Err(ValuationError::InvalidInput(msg)) => assert!(msg.contains("WACC")),
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn range_edges_are_accepted() {
        let query = ValuationQuery {
            forecast_years: 3,
            wacc_pct: 20.0,
            terminal_growth_pct: 6.0,
            initial_fcff: 10000.0,
            fcff_growth_pct: 0.0,
            market_cap: 100.0,
        };
        assert!(query.to_inputs().is_ok());
    }
}
