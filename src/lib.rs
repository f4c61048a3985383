//! Load place/transition nets from PNML and step them under the 1-safe firing rule.
//!
//! The pipeline is `bytes → pnml::parse_bytes → net::validate → NetBuilder::build → Net`.
//! A [`Net`](net::Net) is read-only; simulation passes [`Marking`](net::Marking)
//! values in and gets new ones back.

pub mod config;
pub mod net;
pub mod pnml;

pub use config::{SafetyPolicy, SimConfig};
pub use net::io::{IoError, load_net_from_file};
pub use net::{FireError, Marking, Net, NetBuilder, PlaceId, TransitionId};
pub use pnml::PnmlError;

/// Parses, validates and builds a net from raw PNML bytes.
pub fn load_net(bytes: &[u8], config: &SimConfig) -> Result<Net, PnmlError> {
    let document = pnml::parse_bytes(bytes)?;
    NetBuilder::new(config.clone()).build_document(document)
}
