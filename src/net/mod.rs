//! # 1-safe 位置/迁移网
//!
//! 库所与迁移按 id 字典序编号；每个迁移 `t` 具有输入集合 `Pre(t)` 与输出集合
//! `Post(t)`。对任意标识 `M ∈ ℕ^{|P|}`：
//!
//! * `t` **可发生** 当且仅当 `∀p ∈ Pre(t): M[p] > 0`（大于 1 的计数等同于 1）；
//! * `t` **发生** 后得到新标识：`Pre(t)` 中每个库所减 1，`Post(t)` 中每个库所加 1；
//!   若某库所将变为负数，则返回 [`FireError::NegativeToken`]，不做截断。
//!
//! 网在构建后只读，标识是纯值，所有操作均显式输入输出。
//!
//! ## 示例
//!
//! ```rust
//! use pnsim::net::*;
//! use pnsim::pnml;
//!
//! let doc = pnml::parse_str(r#"<pnml><net id="n">
//!     <place id="p1"><initialMarking><text>1</text></initialMarking></place>
//!     <place id="p2"/>
//!     <transition id="t1"/>
//!     <arc id="a1" source="p1" target="t1"/>
//!     <arc id="a2" source="t1" target="p2"/>
//! </net></pnml>"#).unwrap();
//! let net = NetBuilder::default().build_document(doc).unwrap();
//!
//! let t1 = net.transition_index("t1").unwrap();
//! let m0 = net.initial_marking();
//! assert_eq!(net.enabled_transitions(&m0), vec![t1]);
//! let m1 = net.fire(t1, &m0).unwrap();
//! assert_eq!(m1.as_slice(), &[0, 1]);
//! assert!(net.enabled_transitions(&m1).is_empty());
//! ```

pub mod builder;
pub mod core;
pub mod ids;
pub mod index_vec;
pub mod io;
pub mod structure;
pub mod validate;

pub use builder::NetBuilder;
pub use self::core::{DiagnosticReport, FireError, Net, NetSnapshot};
pub use ids::{PlaceId, TransitionId};
pub use index_vec::{Idx, IndexVec};
pub use structure::{ArcKind, IndexedArc, Marking, PlaceSet, Tokens};
pub use validate::{ValidatedDocument, validate};
