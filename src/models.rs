// src/models.rs
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuationInputs {
    pub forecast_years: usize,
    pub wacc: f64,
    pub terminal_growth: f64,
    pub initial_fcff: f64,
    pub fcff_growth: f64,
    pub market_cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerRow {
    pub company: String,
    pub revenue: f64,
    pub ebitda: f64,
    pub pe: f64,
    pub ev_ebitda: f64,
    pub revenue_growth: f64,
    pub market_cap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DcfResult {
    pub pv_cashflows: f64,
    pub terminal_value: f64,
    pub pv_terminal: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompsResult {
    pub median_pe: f64,
    pub median_ev_ebitda: f64,
    pub eps_proxy: f64,
    pub ebitda_proxy: f64,
    pub pe_value: f64,
    pub ev_ebitda_value: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Buy => "BUY (Undervalued)",
            Recommendation::Hold => "HOLD (Fairly Valued)",
            Recommendation::Sell => "SELL (Overvalued)",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlendedValuation {
    pub dcf_value: f64,
    pub comps_value: f64,
    pub blended_value: f64,
    pub market_cap: f64,
    pub recommendation: Recommendation,
}

/// The four figures that go into both exported reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuationSummary {
    pub dcf_value: f64,
    pub comps_value: f64,
    pub blended_value: f64,
    pub market_cap: f64,
}

impl ValuationSummary {
    /// Metric name and value pairs in report order.
    pub fn metrics(&self) -> [(&'static str, f64); 4] {
        [
            ("DCF Value", self.dcf_value),
            ("Comps Value", self.comps_value),
            ("Blended Value", self.blended_value),
            ("Market Cap", self.market_cap),
        ]
    }
}

impl From<&BlendedValuation> for ValuationSummary {
    fn from(blended: &BlendedValuation) -> Self {
        ValuationSummary {
            dcf_value: blended.dcf_value,
            comps_value: blended.comps_value,
            blended_value: blended.blended_value,
            market_cap: blended.market_cap,
        }
    }
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize)]
pub struct Valuation {
    pub inputs: ValuationInputs,
    pub projected_fcff: Vec<f64>,
    pub dcf: DcfResult,
    pub comps: CompsResult,
    pub blended: BlendedValuation,
}

impl Valuation {
    pub fn summary(&self) -> ValuationSummary {
        ValuationSummary::from(&self.blended)
    }
}
