// src/services/charts.rs
use serde::Serialize;

use crate::models::{PeerRow, Valuation};
use super::report::format_millions;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: usize,
    pub fcff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyPoint {
    pub company: String,
    pub value: f64,
}

/// One bubble: x = P/E, y = EV/EBITDA, size = market cap, colour = growth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiplePoint {
    pub company: String,
    pub pe: f64,
    pub ev_ebitda: f64,
    pub market_cap: f64,
    pub revenue_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodPoint {
    pub method: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: f64,
    pub display: String,
}

fn metric(label: &'static str, value: f64) -> Metric {
    Metric {
        label,
        value,
        display: format_millions(value),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DcfPanel {
    pub metrics: Vec<Metric>,
    pub fcff_projection: Vec<YearPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompsPanel {
    pub peers: Vec<PeerRow>,
    pub pe_ratios: Vec<CompanyPoint>,
    pub ev_ebitda_multiples: Vec<CompanyPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatiosPanel {
    pub revenue_growth: Vec<CompanyPoint>,
    pub multiples_vs_growth: Vec<MultiplePoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryPanel {
    pub metrics: Vec<Metric>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub dcf: DcfPanel,
    pub comps: CompsPanel,
    pub ratios: RatiosPanel,
    pub valuation_bridge: Vec<MethodPoint>,
    pub summary: SummaryPanel,
}

fn company_series(peers: &[PeerRow], value: fn(&PeerRow) -> f64) -> Vec<CompanyPoint> {
    peers
        .iter()
        .map(|p| CompanyPoint {
            company: p.company.clone(),
            value: value(p),
        })
        .collect()
}

pub fn build_charts(valuation: &Valuation, peers: &[PeerRow]) -> DashboardCharts {
    let fcff_projection = valuation
        .projected_fcff
        .iter()
        .enumerate()
        .map(|(i, fcff)| YearPoint { year: i + 1, fcff: *fcff })
        .collect();

    let multiples_vs_growth = peers
        .iter()
        .map(|p| MultiplePoint {
            company: p.company.clone(),
            pe: p.pe,
            ev_ebitda: p.ev_ebitda,
            market_cap: p.market_cap,
            revenue_growth: p.revenue_growth,
        })
        .collect();

    let blended = &valuation.blended;

    DashboardCharts {
        dcf: DcfPanel {
            metrics: vec![
                metric("Enterprise Value (DCF)", valuation.dcf.total),
                metric("PV of Cash Flows", valuation.dcf.pv_cashflows),
                metric("PV of Terminal Value", valuation.dcf.pv_terminal),
            ],
            fcff_projection,
        },
        comps: CompsPanel {
            peers: peers.to_vec(),
            pe_ratios: company_series(peers, |p| p.pe),
            ev_ebitda_multiples: company_series(peers, |p| p.ev_ebitda),
        },
        ratios: RatiosPanel {
            revenue_growth: company_series(peers, |p| p.revenue_growth),
            multiples_vs_growth,
        },
        valuation_bridge: vec![
            MethodPoint { method: "DCF", value: blended.dcf_value },
            MethodPoint { method: "Comps", value: blended.comps_value },
            MethodPoint { method: "Blended", value: blended.blended_value },
        ],
        summary: SummaryPanel {
            metrics: valuation
                .summary()
                .metrics()
                .into_iter()
                .map(|(label, value)| metric(label, value))
                .collect(),
            recommendation: blended.recommendation.label().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValuationInputs;
    use crate::services::peers::reference_peers;
    use crate::services::valuation::value_company;

    fn charts() -> DashboardCharts {
        let inputs = ValuationInputs::new(7, 0.09, 0.03, 2000.0, 0.04, 20000.0).unwrap();
        let peers = reference_peers();
        let valuation = value_company(&inputs, &peers).unwrap();
        build_charts(&valuation, &peers)
    }

    #[test]
    fn projection_years_start_at_one() {
        let charts = charts();
        let years: Vec<usize> = charts.dcf.fcff_projection.iter().map(|p| p.year).collect();
        assert_eq!(years, (1..=7).collect::<Vec<_>>());
        assert_eq!(charts.dcf.fcff_projection[0].fcff, 2000.0);
    }

    #[test]
    fn peer_series_follow_table_order() {
        let charts = charts();
        let pe: Vec<f64> = charts.comps.pe_ratios.iter().map(|p| p.value).collect();
        assert_eq!(pe, vec![15.0, 18.0, 20.0, 17.0, 19.0]);
        assert_eq!(charts.ratios.revenue_growth[2].company, "Comp C");
        assert_eq!(charts.ratios.revenue_growth[2].value, 12.0);
        assert_eq!(charts.ratios.multiples_vs_growth[4].market_cap, 20000.0);
    }

    #[test]
    fn bridge_and_summary_agree() {
        let charts = charts();
        let methods: Vec<&str> = charts.valuation_bridge.iter().map(|p| p.method).collect();
        assert_eq!(methods, vec!["DCF", "Comps", "Blended"]);

        let labels: Vec<&str> = charts.summary.metrics.iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["DCF Value", "Comps Value", "Blended Value", "Market Cap"]);
        assert_eq!(charts.summary.metrics[3].display, "$20,000M");
        assert_eq!(charts.summary.metrics[2].value, charts.valuation_bridge[2].value);
    }
}
