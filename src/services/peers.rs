// src/services/peers.rs
use std::path::PathBuf;
use anyhow::{bail, Context, Result};
use csv::{Reader, ReaderBuilder, Trim};
use log::info;
use serde::Deserialize;

use crate::models::PeerRow;

/// Anything that can hand over a peer table for the comps valuation.
pub trait PeerSource {
    fn load_peers(&self) -> Result<Vec<PeerRow>>;
}

/// The fixed five-company reference table.
pub struct ReferencePeers;

impl PeerSource for ReferencePeers {
    fn load_peers(&self) -> Result<Vec<PeerRow>> {
        Ok(reference_peers())
    }
}

fn peer(company: &str, revenue: f64, ebitda: f64, pe: f64, ev_ebitda: f64, revenue_growth: f64, market_cap: f64) -> PeerRow {
    PeerRow {
        company: company.to_string(),
        revenue,
        ebitda,
        pe,
        ev_ebitda,
        revenue_growth,
        market_cap,
    }
}

pub fn reference_peers() -> Vec<PeerRow> {
    vec![
        peer("Comp A", 2000.0, 400.0, 15.0, 10.0, 8.0, 15000.0),
        peer("Comp B", 2500.0, 500.0, 18.0, 12.0, 10.0, 18000.0),
        peer("Comp C", 1800.0, 350.0, 20.0, 11.0, 12.0, 14000.0),
        peer("Comp D", 2200.0, 420.0, 17.0, 9.0, 9.0, 16000.0),
        peer("Comp E", 2600.0, 480.0, 19.0, 13.0, 11.0, 20000.0),
    ]
}

// Column names as they appear in the exported Comps sheet
#[derive(Debug, Deserialize)]
struct PeerRecord {
    #[serde(rename = "Company")]
    company: String,
    #[serde(rename = "Revenue")]
    revenue: f64,
    #[serde(rename = "EBITDA")]
    ebitda: f64,
    #[serde(rename = "P/E")]
    pe: f64,
    #[serde(rename = "EV/EBITDA")]
    ev_ebitda: f64,
    #[serde(rename = "Revenue_Growth")]
    revenue_growth: f64,
    #[serde(rename = "Market_Cap")]
    market_cap: f64,
}

impl From<PeerRecord> for PeerRow {
    fn from(r: PeerRecord) -> Self {
        PeerRow {
            company: r.company,
            revenue: r.revenue,
            ebitda: r.ebitda,
            pe: r.pe,
            ev_ebitda: r.ev_ebitda,
            revenue_growth: r.revenue_growth,
            market_cap: r.market_cap,
        }
    }
}

/// Peer table read from a CSV file with the Comps sheet header row.
pub struct CsvPeers {
    path: PathBuf,
}

impl CsvPeers {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvPeers { path: path.into() }
    }
}

impl PeerSource for CsvPeers {
    fn load_peers(&self) -> Result<Vec<PeerRow>> {
        info!("Loading peer table from {}", self.path.display());
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("opening peer table {}", self.path.display()))?;
        let peers = read_peers(&mut rdr)
            .with_context(|| format!("parsing peer table {}", self.path.display()))?;
        info!("Loaded {} peers", peers.len());
        Ok(peers)
    }
}

fn read_peers<R: std::io::Read>(rdr: &mut Reader<R>) -> Result<Vec<PeerRow>> {
    let mut peers = Vec::new();
    for record in rdr.deserialize::<PeerRecord>() {
        let peer = PeerRow::from(record?);
        let figures = [
            peer.revenue,
            peer.ebitda,
            peer.pe,
            peer.ev_ebitda,
            peer.revenue_growth,
            peer.market_cap,
        ];
        if !figures.iter().all(|v| v.is_finite()) {
            bail!("peer {} has a non-finite figure", peer.company);
        }
        peers.push(peer);
    }
    if peers.is_empty() {
        bail!("peer table has no data rows");
    }
    Ok(peers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Company,Revenue,EBITDA,P/E,EV/EBITDA,Revenue_Growth,Market_Cap\n";

    #[test]
    fn reference_table_has_five_peers() {
        let peers = ReferencePeers.load_peers().unwrap();
        assert_eq!(peers.len(), 5);
        assert_eq!(peers[0].company, "Comp A");
        assert_eq!(peers[4].market_cap, 20000.0);
    }

    #[test]
    fn csv_peers_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}Acme, 1200,300,22.5,14,6.5,9000\nGlobex,800,150,12,7,3,4000\n", HEADER).unwrap();

        let peers = CsvPeers::new(file.path()).load_peers().unwrap();
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0].company, "Acme");
        assert_eq!(peers[0].pe, 22.5);
        assert_eq!(peers[1].ev_ebitda, 7.0);
    }

    #[test]
    fn csv_peers_reject_header_only_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", HEADER).unwrap();
        assert!(CsvPeers::new(file.path()).load_peers().is_err());
    }

    #[test]
    fn csv_peers_reject_non_numeric_multiple() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}Acme,1200,300,n/a,14,6.5,9000\n", HEADER).unwrap();
        assert!(CsvPeers::new(file.path()).load_peers().is_err());
    }

    #[test]
    fn csv_peers_reject_non_finite_figure() {
        for row in ["Acme,1,1,NaN,9,1,1", "Acme,1,1,12,inf,1,1", "Acme,1,1,12,9,1,-inf"] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, "{}{}\n", HEADER, row).unwrap();
            let err = CsvPeers::new(file.path()).load_peers().unwrap_err();
            assert!(format!("{:#}", err).contains("Acme"), "unexpected error: {:#}", err);
        }
    }

    #[test]
    fn missing_csv_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CsvPeers::new(dir.path().join("peers.csv")).load_peers().is_err());
    }
}
