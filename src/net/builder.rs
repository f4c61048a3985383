//! 网构建：按 id 字典序分配索引，生成初始标识与 Pre/Post 集合.
use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, warn};

use crate::config::{SafetyPolicy, SimConfig};
use crate::net::core::Net;
use crate::net::ids::{PlaceId, TransitionId};
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::structure::{ArcKind, IndexedArc, Marking, PlaceSet};
use crate::net::validate::{ValidatedDocument, validate};
use crate::pnml::{PetriDocument, Place, PnmlError};

/// Turns a [`ValidatedDocument`] into a read-only [`Net`].
#[derive(Debug, Clone, Default)]
pub struct NetBuilder {
    config: SimConfig,
}

impl NetBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn build(&self, validated: ValidatedDocument) -> Result<Net, PnmlError> {
        let doc = validated.document();
        let (places, place_slots) = assign_indices::<PlaceId, _>(&doc.places);
        let (transitions, transition_slots) = assign_indices::<TransitionId, _>(&doc.transitions);

        let mut pre: IndexVec<TransitionId, PlaceSet> =
            IndexVec::from_fn(transitions.len(), |_| PlaceSet::new());
        let mut post = pre.clone();
        let mut arcs = Vec::with_capacity(validated.arcs().len());

        for (id, kind) in validated.arcs() {
            let kind = match *kind {
                ArcKind::PlaceToTransition { place, transition } => {
                    let (place, transition) = (place_slots[place], transition_slots[transition]);
                    pre[transition].push(place);
                    ArcKind::PlaceToTransition { place, transition }
                }
                ArcKind::TransitionToPlace { transition, place } => {
                    let (place, transition) = (place_slots[place], transition_slots[transition]);
                    post[transition].push(place);
                    ArcKind::TransitionToPlace { transition, place }
                }
            };
            arcs.push(IndexedArc {
                id: id.clone(),
                kind,
            });
        }

        // parallel arcs collapse into a single set entry
        for set in pre.iter_mut().chain(post.iter_mut()) {
            set.sort_unstable();
            set.dedup();
        }

        let initial_marking = Marking::from_vec(places.iter().map(|p| p.initial_marking).collect());
        self.check_one_safe(&places, &initial_marking)?;

        let place_index: HashMap<String, PlaceId> = places
            .iter_enumerated()
            .map(|(idx, place)| (place.id.clone(), idx))
            .collect();
        let transition_index: HashMap<String, TransitionId> = transitions
            .iter_enumerated()
            .map(|(idx, transition)| (transition.id.clone(), idx))
            .collect();

        let net = Net {
            places,
            transitions,
            place_index,
            transition_index,
            pre,
            post,
            arcs,
            initial_marking,
        };
        debug!(
            "built net: {} places, {} transitions, M0 = {}",
            net.places_len(),
            net.transitions_len(),
            net.initial_marking
        );

        if self.config.diagnostics {
            net.log_diagnostics();
        }
        Ok(net)
    }

    /// Validates and builds in one step.
    pub fn build_document(&self, document: PetriDocument) -> Result<Net, PnmlError> {
        self.build(validate(document)?)
    }

    fn check_one_safe(
        &self,
        places: &IndexVec<PlaceId, Place>,
        marking: &Marking,
    ) -> Result<(), PnmlError> {
        for (place, tokens) in marking.iter().filter(|(_, tokens)| *tokens > 1) {
            let id = &places[place].id;
            match self.config.safety {
                SafetyPolicy::Warn => warn!(
                    "initial marking is not 1-safe: place {id:?} holds {tokens} tokens; firing results are unreliable"
                ),
                SafetyPolicy::Reject => {
                    return Err(PnmlError::NotOneSafe {
                        place: id.clone(),
                        tokens,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Orders `entries` by id and returns them together with a table mapping each
/// document position to its assigned index.
fn assign_indices<I: Idx, V: Clone>(entries: &IndexMap<String, V>) -> (IndexVec<I, V>, Vec<I>) {
    let mut slots = vec![I::from_usize(0); entries.len()];
    let mut ordered = IndexVec::new();
    for (position, (_, value)) in entries
        .iter()
        .enumerate()
        .sorted_by(|(_, (a, _)), (_, (b, _))| a.cmp(b))
    {
        slots[position] = ordered.push(value.clone());
    }
    (ordered, slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pnml::{Arc, Place, Transition};

    fn doc(places: &[(&str, u64)], transitions: &[&str], arcs: &[(&str, &str)]) -> PetriDocument {
        let mut doc = PetriDocument::new();
        for (id, tokens) in places {
            doc.places.insert((*id).into(), Place::new(*id, *id, *tokens));
        }
        for id in transitions {
            doc.transitions.insert((*id).into(), Transition::new(*id, *id));
        }
        for (n, (source, target)) in arcs.iter().enumerate() {
            doc.arcs.push(Arc::new(format!("a{n}"), *source, *target));
        }
        doc
    }

    #[test]
    fn indices_follow_lexicographic_id_order() {
        let net = NetBuilder::default()
            .build_document(doc(
                &[("p10", 0), ("p2", 1), ("p1", 0)],
                &["tb", "ta"],
                &[],
            ))
            .unwrap();

        let place_ids: Vec<_> = net.places().map(|(_, p)| p.id.as_str()).collect();
        assert_eq!(place_ids, vec!["p1", "p10", "p2"]);
        assert_eq!(net.transition_index("ta"), Some(TransitionId::new(0)));
        assert_eq!(net.transition_index("tb"), Some(TransitionId::new(1)));
        assert_eq!(net.initial_marking(), Marking::from_vec(vec![0, 0, 1]));
    }

    #[test]
    fn pre_and_post_sets_are_sorted_and_deduplicated() {
        let net = NetBuilder::default()
            .build_document(doc(
                &[("c", 1), ("a", 1), ("b", 0)],
                &["t"],
                &[("c", "t"), ("a", "t"), ("a", "t"), ("t", "b")],
            ))
            .unwrap();
        let t = net.transition_index("t").unwrap();
        assert_eq!(net.pre(t), &[PlaceId::new(0), PlaceId::new(2)]);
        assert_eq!(net.post(t), &[PlaceId::new(1)]);
        assert_eq!(net.arcs().len(), 4);
    }

    #[test]
    fn non_binary_marking_warns_by_default() {
        let net = NetBuilder::default()
            .build_document(doc(&[("p", 3)], &[], &[]))
            .unwrap();
        assert_eq!(net.unsafe_places(), vec![(PlaceId::new(0), 3)]);
    }

    #[test]
    fn non_binary_marking_rejected_under_strict_policy() {
        let err = NetBuilder::new(SimConfig::strict())
            .build_document(doc(&[("ok", 1), ("p", 2)], &[], &[]))
            .unwrap_err();
        match err {
            PnmlError::NotOneSafe { place, tokens } => {
                assert_eq!(place, "p");
                assert_eq!(tokens, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_arcs_stop_the_build() {
        let err = NetBuilder::default()
            .build_document(doc(&[("p", 0)], &["t"], &[("t", "pX")]))
            .unwrap_err();
        assert!(matches!(err, PnmlError::ReferentialIntegrity { .. }));
    }
}
