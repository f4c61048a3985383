//! I/O 支持：读取 PNML 文档字节，以及快照的 JSON/RON 序列化.
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use log::debug;
use ron::ser::PrettyConfig;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::config::SimConfig;
use crate::net::NetBuilder;
use crate::net::core::Net;
use crate::pnml::{self, PnmlError};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ron error: {0}")]
    Ron(#[from] ron::Error),
    #[error("ron parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Pnml(#[from] PnmlError),
}

/// Reads the raw bytes of a named document.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, IoError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Reads, parses, validates and builds the net stored at `path`.
pub fn load_net_from_file<P: AsRef<Path>>(path: P, config: &SimConfig) -> Result<Net, IoError> {
    let bytes = read_document(path)?;
    let document = pnml::parse_bytes(&bytes)?;
    Ok(NetBuilder::new(config.clone()).build_document(document)?)
}

pub fn to_json_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(s)?)
}

pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), IoError> {
    let mut file = File::create(path)?;
    let content = to_json_string(value)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn to_ron_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    let mut pretty = PrettyConfig::default();
    pretty.new_line = "\n".into();
    Ok(ron::ser::to_string_pretty(value, pretty)?)
}

pub fn from_ron_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(ron::from_str(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::NetSnapshot;

    const NET: &str = r#"<pnml><net id="n">
        <place id="p1"><initialMarking><text>1</text></initialMarking></place>
        <place id="p2"/>
        <transition id="t1"/>
        <arc id="a1" source="p1" target="t1"/>
        <arc id="a2" source="t1" target="p2"/>
    </net></pnml>"#;

    #[test]
    fn loads_a_net_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.pnml");
        fs::write(&path, NET).unwrap();

        let net = load_net_from_file(&path, &SimConfig::default()).unwrap();
        assert_eq!(net.places_len(), 2);
        assert_eq!(net.initial_marking().as_slice(), &[1, 0]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(dir.path().join("nope.pnml")).unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }

    #[test]
    fn parse_errors_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pnml");
        fs::write(&path, "<pnml/>").unwrap();
        let err = load_net_from_file(&path, &SimConfig::default()).unwrap_err();
        assert!(matches!(err, IoError::Pnml(PnmlError::MalformedDocument)));
    }

    #[test]
    fn snapshot_survives_json_and_ron() {
        let net = NetBuilder::default()
            .build_document(pnml::parse_str(NET).unwrap())
            .unwrap();
        let snapshot = net.snapshot(&net.initial_marking()).unwrap();

        let json = to_json_string(&snapshot).unwrap();
        assert!(json.contains("\"place_index\""));
        assert_eq!(from_json_str::<NetSnapshot>(&json).unwrap(), snapshot);

        let ron = to_ron_string(&snapshot).unwrap();
        assert_eq!(from_ron_str::<NetSnapshot>(&ron).unwrap(), snapshot);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        write_json(&path, &snapshot).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), json);
    }
}
