// src/config.rs
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use anyhow::{Context, Result};
use log::{info, warn};

use crate::models::PeerRow;
use crate::services::peers::{CsvPeers, PeerSource, ReferencePeers};

const DEFAULT_PORT: u16 = 3030;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub peers_csv: Option<PathBuf>,
}

impl Config {
    /// Reads `PORT` and `PEERS_CSV`, picking up a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_values(env::var("PORT").ok(), env::var("PEERS_CSV").ok())
    }

    pub fn from_values(port: Option<String>, peers_csv: Option<String>) -> Result<Self> {
        let port = match port {
            Some(port_str) => port_str
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got {:?}", port_str))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };
        info!("Using PORT: {}", port);

        let peers_csv = peers_csv
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Config { port, peers_csv })
    }

    /// Bind on all interfaces.
    pub fn addr(&self) -> SocketAddr {
        ([0, 0, 0, 0], self.port).into()
    }

    pub fn peer_source(&self) -> Box<dyn PeerSource> {
        match &self.peers_csv {
            Some(path) => Box::new(CsvPeers::new(path.clone())),
            None => {
                info!("PEERS_CSV not set, using the reference peer table");
                Box::new(ReferencePeers)
            }
        }
    }

    pub fn load_peers(&self) -> Result<Vec<PeerRow>> {
        self.peer_source().load_peers()
    }
}
