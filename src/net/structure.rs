//! 终结网的值类型：标识、已解析弧与库所集合.
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::index_vec::IndexVec;

pub type Tokens = u64;

/// Sorted, duplicate-free set of place indices (a pre-set or post-set).
pub type PlaceSet = SmallVec<[PlaceId; 4]>;

/// An arc whose direction has been resolved against the net's node sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArcKind<P, T> {
    PlaceToTransition { place: P, transition: T },
    TransitionToPlace { transition: T, place: P },
}

impl<P, T> ArcKind<P, T> {
    pub fn place(&self) -> &P {
        match self {
            ArcKind::PlaceToTransition { place, .. } | ArcKind::TransitionToPlace { place, .. } => {
                place
            }
        }
    }

    pub fn transition(&self) -> &T {
        match self {
            ArcKind::PlaceToTransition { transition, .. }
            | ArcKind::TransitionToPlace { transition, .. } => transition,
        }
    }
}

/// Arc endpoints in index space, as stored by a finalized net.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexedArc {
    pub id: String,
    pub kind: ArcKind<PlaceId, TransitionId>,
}

/// Token count per place, positioned by place index.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marking(IndexVec<PlaceId, Tokens>);

impl Marking {
    pub fn new(tokens: IndexVec<PlaceId, Tokens>) -> Self {
        Self(tokens)
    }

    pub fn from_vec(tokens: Vec<Tokens>) -> Self {
        Self(IndexVec::from_vec(tokens))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Token count at `place`, or `None` if the marking has no such position.
    pub fn get(&self, place: PlaceId) -> Option<Tokens> {
        self.0.get(place).copied()
    }

    pub(crate) fn tokens_mut(&mut self, place: PlaceId) -> &mut Tokens {
        &mut self.0[place]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlaceId, Tokens)> + '_ {
        self.0.iter_enumerated().map(|(place, tokens)| (place, *tokens))
    }

    pub fn total(&self) -> u128 {
        self.0.iter().map(|&tokens| u128::from(tokens)).sum()
    }

    /// Places currently holding at least one token.
    pub fn marked_places(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.iter()
            .filter(|(_, tokens)| *tokens > 0)
            .map(|(place, _)| place)
    }

    pub fn is_binary(&self) -> bool {
        self.0.iter().all(|&tokens| tokens <= 1)
    }

    pub fn as_slice(&self) -> &[Tokens] {
        self.0.as_slice()
    }

    pub fn into_vec(self) -> Vec<Tokens> {
        self.0.into_vec()
    }
}

impl From<Vec<Tokens>> for Marking {
    fn from(tokens: Vec<Tokens>) -> Self {
        Self::from_vec(tokens)
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marking{self}")
    }
}

impl fmt::Display for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (idx, tokens) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{tokens}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::index_vec::Idx;

    #[test]
    fn marking_formats_as_tuple() {
        let m = Marking::from_vec(vec![1, 0, 2]);
        assert_eq!(m.to_string(), "(1, 0, 2)");
        assert_eq!(format!("{m:?}"), "Marking(1, 0, 2)");
        assert_eq!(Marking::from_vec(vec![]).to_string(), "()");
    }

    #[test]
    fn marking_queries() {
        let m = Marking::from_vec(vec![1, 0, 2]);
        assert_eq!(m.total(), 3);
        assert!(!m.is_binary());
        assert_eq!(m.get(PlaceId::from_usize(2)), Some(2));
        assert_eq!(m.get(PlaceId::from_usize(3)), None);
        assert_eq!(
            m.marked_places().collect::<Vec<_>>(),
            vec![PlaceId::new(0), PlaceId::new(2)]
        );
    }

    #[test]
    fn markings_compare_by_value() {
        let a = Marking::from_vec(vec![0, 1]);
        let b: Marking = vec![0, 1].into();
        assert_eq!(a, b);
        assert_ne!(a, Marking::from_vec(vec![1, 0]));
    }

    #[test]
    fn arc_kind_accessors() {
        let arc: ArcKind<&str, &str> = ArcKind::TransitionToPlace {
            transition: "t",
            place: "p",
        };
        assert_eq!(*arc.place(), "p");
        assert_eq!(*arc.transition(), "t");
    }
}
