//! 弧引用完整性校验：每条弧必须连接一个已知库所与一个已知迁移.
use log::debug;

use crate::net::structure::ArcKind;
use crate::pnml::{PetriDocument, PnmlError};

/// Arc endpoints as positions into [`PetriDocument::places`] / [`PetriDocument::transitions`].
pub type DocumentArc = ArcKind<usize, usize>;

/// A document whose arcs have all been checked and resolved.
///
/// Only [`validate`] produces this type, so holding one is proof that every arc
/// joins exactly one place and one transition.
#[derive(Debug, Clone)]
pub struct ValidatedDocument {
    document: PetriDocument,
    arcs: Vec<(String, DocumentArc)>,
}

impl ValidatedDocument {
    pub fn document(&self) -> &PetriDocument {
        &self.document
    }

    /// Resolved arcs in document order, paired with their ids.
    pub fn arcs(&self) -> &[(String, DocumentArc)] {
        &self.arcs
    }

}

/// Checks every arc of `document` and resolves its direction.
///
/// Fails on the first arc whose source or target is not a known id, or whose
/// endpoints are both places or both transitions. An id shared by a place and a
/// transition is only an error once an arc uses it as an endpoint.
pub fn validate(document: PetriDocument) -> Result<ValidatedDocument, PnmlError> {
    let mut arcs = Vec::with_capacity(document.arcs.len());
    for arc in &document.arcs {
        for endpoint in [&arc.source, &arc.target] {
            if !document.contains_node(endpoint) {
                return Err(PnmlError::ReferentialIntegrity {
                    arc: arc.id.clone(),
                    endpoint: endpoint.clone(),
                });
            }
            if document.is_place(endpoint) && document.is_transition(endpoint) {
                return Err(PnmlError::IdCollision {
                    arc: arc.id.clone(),
                    id: endpoint.clone(),
                });
            }
        }

        let place_of = |id: &str| document.places.get_index_of(id);
        let transition_of = |id: &str| document.transitions.get_index_of(id);
        let kind = match (
            place_of(arc.source.as_str()),
            transition_of(arc.target.as_str()),
            transition_of(arc.source.as_str()),
            place_of(arc.target.as_str()),
        ) {
            (Some(place), Some(transition), _, _) => {
                ArcKind::PlaceToTransition { place, transition }
            }
            (_, _, Some(transition), Some(place)) => {
                ArcKind::TransitionToPlace { transition, place }
            }
            _ => {
                return Err(PnmlError::ArcKind {
                    arc: arc.id.clone(),
                    source_id: arc.source.clone(),
                    target_id: arc.target.clone(),
                });
            }
        };
        arcs.push((arc.id.clone(), kind));
    }

    debug!("validated {} arcs", arcs.len());
    Ok(ValidatedDocument { document, arcs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pnml::{Arc, Place, Transition};

    fn document(arcs: &[(&str, &str, &str)]) -> PetriDocument {
        let mut doc = PetriDocument::new();
        for id in ["p1", "p2"] {
            doc.places.insert(id.into(), Place::new(id, id, 0));
        }
        for id in ["t1", "t2"] {
            doc.transitions.insert(id.into(), Transition::new(id, id));
        }
        doc.arcs = arcs
            .iter()
            .map(|(id, source, target)| Arc::new(*id, *source, *target))
            .collect();
        doc
    }

    #[test]
    fn resolves_direction_by_node_kind() {
        let valid = validate(document(&[("a1", "p2", "t1"), ("a2", "t2", "p1")])).unwrap();
        assert_eq!(
            valid.arcs(),
            &[
                (
                    "a1".to_string(),
                    ArcKind::PlaceToTransition {
                        place: 1,
                        transition: 0
                    }
                ),
                (
                    "a2".to_string(),
                    ArcKind::TransitionToPlace {
                        transition: 1,
                        place: 0
                    }
                ),
            ]
        );
    }

    #[test]
    fn unknown_target_names_arc_and_endpoint() {
        let err = validate(document(&[("a1", "p1", "t1"), ("a9", "t1", "pX")])).unwrap_err();
        match err {
            PnmlError::ReferentialIntegrity { arc, endpoint } => {
                assert_eq!(arc, "a9");
                assert_eq!(endpoint, "pX");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_source_is_reported_before_target() {
        let err = validate(document(&[("a", "ghost", "nowhere")])).unwrap_err();
        assert!(matches!(
            err,
            PnmlError::ReferentialIntegrity { endpoint, .. } if endpoint == "ghost"
        ));
    }

    #[test]
    fn same_kind_arcs_are_rejected() {
        for (source, target) in [("p1", "p2"), ("t1", "t2")] {
            let err = validate(document(&[("bad", source, target)])).unwrap_err();
            assert!(matches!(err, PnmlError::ArcKind { arc, .. } if arc == "bad"));
        }
    }

    #[test]
    fn shared_id_without_arcs_is_accepted() {
        let mut doc = document(&[("a1", "p2", "t1")]);
        doc.transitions.insert("p1".into(), Transition::new("p1", "p1"));
        let valid = validate(doc).unwrap();
        assert_eq!(valid.arcs().len(), 1);
    }

    #[test]
    fn arc_on_shared_id_is_ambiguous() {
        let mut doc = document(&[("a1", "p2", "t1"), ("a2", "p1", "t2")]);
        doc.transitions.insert("p1".into(), Transition::new("p1", "p1"));
        assert!(matches!(
            validate(doc).unwrap_err(),
            PnmlError::IdCollision { arc, id } if arc == "a2" && id == "p1"
        ));
    }

    #[test]
    fn empty_net_is_valid() {
        let valid = validate(PetriDocument::new()).unwrap();
        assert!(valid.arcs().is_empty());
        assert!(valid.document().places.is_empty());
    }
}
