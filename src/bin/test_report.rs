// src/bin/test_report.rs
use std::env;
use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result};

use equity_valuation_dashboard::handlers::query::ValuationQuery;
use equity_valuation_dashboard::services::peers::reference_peers;
use equity_valuation_dashboard::services::report::{
    format_millions, render_document, render_spreadsheet, DOCUMENT_FILE_NAME, SPREADSHEET_FILE_NAME,
};
use equity_valuation_dashboard::services::valuation::value_company;

fn main() -> Result<()> {
    env_logger::init();

    // Output directory, defaults to the current one
    let out_dir = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let inputs = ValuationQuery::default().to_inputs()?;
    let peers = reference_peers();
    let valuation = value_company(&inputs, &peers)?;

    println!("Projected FCFF:       {:?}", valuation.projected_fcff);
    println!("PV of Cash Flows:     {}", format_millions(valuation.dcf.pv_cashflows));
    println!("PV of Terminal Value: {}", format_millions(valuation.dcf.pv_terminal));
    println!("DCF Value:            {}", format_millions(valuation.dcf.total));
    println!("Comps Value:          {}", format_millions(valuation.comps.value));
    println!("Blended Value:        {}", format_millions(valuation.blended.blended_value));
    println!("Recommendation:       {}", valuation.blended.recommendation);

    let summary = valuation.summary();
    let xlsx_path = out_dir.join(SPREADSHEET_FILE_NAME);
    fs::write(&xlsx_path, render_spreadsheet(&summary, &peers)?)
        .with_context(|| format!("writing {}", xlsx_path.display()))?;
    let pdf_path = out_dir.join(DOCUMENT_FILE_NAME);
    fs::write(&pdf_path, render_document(&summary, valuation.blended.recommendation.label())?)
        .with_context(|| format!("writing {}", pdf_path.display()))?;

    println!("Wrote {} and {}", xlsx_path.display(), pdf_path.display());
    Ok(())
}
