//! PNML 文档读取：字节流 → 原始实体集合（命名空间无关）.
//!
//! Only the first `net` element of a document is read. Element and attribute
//! names are compared by local name, so `<pnml:place>` and `<place>` are the
//! same thing to the reader.

pub mod model;
pub mod reader;

use thiserror::Error;

use crate::net::structure::Tokens;
pub use model::{Arc, EntityKind, PetriDocument, Place, Transition};
pub use reader::{parse_bytes, parse_str};

/// Everything that can reject a document before a [`Net`](crate::net::Net) exists.
#[derive(Debug, Error)]
pub enum PnmlError {
    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("document is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("malformed document: no `net` element found")]
    MalformedDocument,
    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: EntityKind, id: String },
    #[error("{kind} {element} is missing required attribute `{attribute}`")]
    MissingAttribute {
        kind: EntityKind,
        element: String,
        attribute: &'static str,
    },
    #[error("arc {arc:?} references unknown node {endpoint:?}")]
    ReferentialIntegrity { arc: String, endpoint: String },
    #[error("arc {arc:?} must join a place and a transition, got {source_id:?} -> {target_id:?}")]
    ArcKind {
        arc: String,
        source_id: String,
        target_id: String,
    },
    #[error("arc {arc:?} endpoint {id:?} names both a place and a transition")]
    IdCollision { arc: String, id: String },
    #[error("initial marking is not 1-safe: place {place:?} holds {tokens} tokens")]
    NotOneSafe { place: String, tokens: Tokens },
}
