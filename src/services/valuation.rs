// src/services/valuation.rs
use std::fmt;
use log::{debug, warn};
use crate::models::{
    BlendedValuation, CompsResult, DcfResult, PeerRow, Recommendation, Valuation, ValuationInputs,
};

const BUY_THRESHOLD: f64 = 1.2;
const SELL_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub enum ValuationError {
    InvalidInput(String),
    Export(String),
}

impl fmt::Display for ValuationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValuationError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ValuationError::Export(msg) => write!(f, "Export failed: {}", msg),
        }
    }
}

impl std::error::Error for ValuationError {}

pub type Result<T> = std::result::Result<T, ValuationError>;

impl ValuationInputs {
    /// Builds the input record, rejecting a discount rate that does not exceed
    /// terminal growth since the perpetuity formula is undefined there.
    pub fn new(
        forecast_years: usize,
        wacc: f64,
        terminal_growth: f64,
        initial_fcff: f64,
        fcff_growth: f64,
        market_cap: f64,
    ) -> Result<Self> {
        if forecast_years == 0 {
            return Err(ValuationError::InvalidInput(
                "forecast horizon must be at least one year".to_string(),
            ));
        }
        check_discount_spread(wacc, terminal_growth)?;
        Ok(ValuationInputs {
            forecast_years,
            wacc,
            terminal_growth,
            initial_fcff,
            fcff_growth,
            market_cap,
        })
    }
}

fn check_discount_spread(wacc: f64, terminal_growth: f64) -> Result<()> {
    if wacc > terminal_growth {
        Ok(())
    } else {
        warn!("Rejecting WACC {} <= terminal growth {}", wacc, terminal_growth);
        Err(ValuationError::InvalidInput(format!(
            "WACC ({:.2}%) must be greater than terminal growth ({:.2}%)",
            wacc * 100.0,
            terminal_growth * 100.0
        )))
    }
}

pub fn project_cash_flows(initial: f64, growth_rate: f64, years: usize) -> Vec<f64> {
    (0..years)
        .map(|i| initial * (1.0 + growth_rate).powi(i as i32))
        .collect()
}

pub fn discounted_cash_flow(cashflows: &[f64], wacc: f64, terminal_growth: f64) -> Result<DcfResult> {
    check_discount_spread(wacc, terminal_growth)?;
    let last = *cashflows.last().ok_or_else(|| {
        ValuationError::InvalidInput("no projected cash flows to discount".to_string())
    })?;

    let pv_cashflows: f64 = cashflows
        .iter()
        .enumerate()
        .map(|(i, cf)| cf / (1.0 + wacc).powi(i as i32 + 1))
        .sum();

    let terminal_value = last * (1.0 + terminal_growth) / (wacc - terminal_growth);
    let pv_terminal = terminal_value / (1.0 + wacc).powi(cashflows.len() as i32);

    Ok(DcfResult {
        pv_cashflows,
        terminal_value,
        pv_terminal,
        total: pv_cashflows + pv_terminal,
    })
}

/// Median with the two middle values averaged for even-sized input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn comps_valuation(peers: &[PeerRow], subject_initial_fcff: f64) -> Result<CompsResult> {
    let pes: Vec<f64> = peers.iter().map(|p| p.pe).collect();
    let ev_ebitdas: Vec<f64> = peers.iter().map(|p| p.ev_ebitda).collect();

    let (median_pe, median_ev_ebitda) = match (median(&pes), median(&ev_ebitdas)) {
        (Some(pe), Some(ev)) => (pe, ev),
        _ => {
            return Err(ValuationError::InvalidInput(
                "peer table is empty".to_string(),
            ))
        }
    };

    // Placeholder proxies for per-share earnings and EBITDA
    let eps_proxy = subject_initial_fcff / 100.0;
    let ebitda_proxy = subject_initial_fcff * 0.8;

    let pe_value = eps_proxy * median_pe;
    let ev_ebitda_value = ebitda_proxy * median_ev_ebitda;

    Ok(CompsResult {
        median_pe,
        median_ev_ebitda,
        eps_proxy,
        ebitda_proxy,
        pe_value,
        ev_ebitda_value,
        value: (pe_value + ev_ebitda_value) / 2.0,
    })
}

pub fn recommend(blended_value: f64, market_cap: f64) -> Recommendation {
    if blended_value > market_cap * BUY_THRESHOLD {
        Recommendation::Buy
    } else if blended_value < market_cap * SELL_THRESHOLD {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    }
}

pub fn blend(dcf_total: f64, comps_value: f64, market_cap: f64) -> BlendedValuation {
    let blended_value = (dcf_total + comps_value) / 2.0;
    BlendedValuation {
        dcf_value: dcf_total,
        comps_value,
        blended_value,
        market_cap,
        recommendation: recommend(blended_value, market_cap),
    }
}

/// Runs projection, DCF, comps and blend for one set of inputs.
pub fn value_company(inputs: &ValuationInputs, peers: &[PeerRow]) -> Result<Valuation> {
    let projected_fcff = project_cash_flows(
        inputs.initial_fcff,
        inputs.fcff_growth,
        inputs.forecast_years,
    );
    let dcf = discounted_cash_flow(&projected_fcff, inputs.wacc, inputs.terminal_growth)?;
    let comps = comps_valuation(peers, inputs.initial_fcff)?;
    let blended = blend(dcf.total, comps.value, inputs.market_cap);

    debug!(
        "DCF {:.2}, comps {:.2}, blended {:.2} vs market cap {:.2} -> {:?}",
        dcf.total, comps.value, blended.blended_value, inputs.market_cap, blended.recommendation
    );

    Ok(Valuation {
        inputs: *inputs,
        projected_fcff,
        dcf,
        comps,
        blended,
    })
}
