//! 运行时: 终结网、可发生判定与单步发生语义（1-safe 解释）.
use std::collections::{BTreeMap, HashMap};

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::structure::{IndexedArc, Marking, PlaceSet, Tokens};
use crate::pnml::{Place, Transition};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FireError {
    #[error("transition {0:?} is out of bounds")]
    OutOfBounds(TransitionId),
    #[error("marking has {actual} entries, net has {expected} places")]
    MarkingLength { expected: usize, actual: usize },
    #[error("firing {transition:?} would drive place {place:?} below zero tokens")]
    NegativeToken {
        transition: TransitionId,
        place: PlaceId,
    },
    #[error("firing {transition:?} overflows the token count of place {place:?}")]
    Overflow {
        transition: TransitionId,
        place: PlaceId,
    },
}

/// Connectivity findings for a built net.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticReport {
    /// Places touched by no arc.
    pub isolated_places: Vec<(PlaceId, String)>,
    /// Transitions touched by no arc.
    pub isolated_transitions: Vec<(TransitionId, String)>,
    pub warnings: Vec<String>,
    pub total_places: usize,
    pub total_transitions: usize,
}

impl DiagnosticReport {
    pub fn has_issues(&self) -> bool {
        !self.isolated_places.is_empty()
            || !self.isolated_transitions.is_empty()
            || !self.warnings.is_empty()
    }
}

/// Read-only view handed to renderers: ids by index plus one marking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSnapshot {
    pub places: Vec<String>,
    pub transitions: Vec<String>,
    pub place_index: BTreeMap<String, usize>,
    pub marking: Vec<Tokens>,
}

/// A finalized net. Built once by [`NetBuilder`](crate::net::NetBuilder), never mutated.
///
/// Every engine method takes the marking explicitly and returns a fresh one;
/// the net holds no "current" state, so one `Net` can be shared across threads.
#[derive(Debug, Clone, Serialize)]
pub struct Net {
    pub(crate) places: IndexVec<PlaceId, Place>,
    pub(crate) transitions: IndexVec<TransitionId, Transition>,
    pub(crate) place_index: HashMap<String, PlaceId>,
    pub(crate) transition_index: HashMap<String, TransitionId>,
    pub(crate) pre: IndexVec<TransitionId, PlaceSet>,
    pub(crate) post: IndexVec<TransitionId, PlaceSet>,
    pub(crate) arcs: Vec<IndexedArc>,
    pub(crate) initial_marking: Marking,
}

impl Net {
    pub fn places_len(&self) -> usize {
        self.places.len()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions.len()
    }

    pub fn places(&self) -> impl Iterator<Item = (PlaceId, &Place)> {
        self.places.iter_enumerated()
    }

    pub fn transitions(&self) -> impl Iterator<Item = (TransitionId, &Transition)> {
        self.transitions.iter_enumerated()
    }

    pub fn place(&self, place: PlaceId) -> Option<&Place> {
        self.places.get(place)
    }

    pub fn transition(&self, transition: TransitionId) -> Option<&Transition> {
        self.transitions.get(transition)
    }

    pub fn place_index(&self, id: &str) -> Option<PlaceId> {
        self.place_index.get(id).copied()
    }

    pub fn transition_index(&self, id: &str) -> Option<TransitionId> {
        self.transition_index.get(id).copied()
    }

    pub fn place_id(&self, place: PlaceId) -> Option<&str> {
        self.places.get(place).map(|p| p.id.as_str())
    }

    pub fn transition_id(&self, transition: TransitionId) -> Option<&str> {
        self.transitions.get(transition).map(|t| t.id.as_str())
    }

    /// Input places of `transition`, ascending. Empty for an unknown index.
    pub fn pre(&self, transition: TransitionId) -> &[PlaceId] {
        self.pre.get(transition).map(|set| set.as_slice()).unwrap_or(&[])
    }

    /// Output places of `transition`, ascending. Empty for an unknown index.
    pub fn post(&self, transition: TransitionId) -> &[PlaceId] {
        self.post.get(transition).map(|set| set.as_slice()).unwrap_or(&[])
    }

    pub fn arcs(&self) -> &[IndexedArc] {
        &self.arcs
    }

    /// A fresh copy of M0.
    pub fn initial_marking(&self) -> Marking {
        self.initial_marking.clone()
    }

    /// Places whose initial token count is above one.
    pub fn unsafe_places(&self) -> Vec<(PlaceId, Tokens)> {
        self.initial_marking
            .iter()
            .filter(|(_, tokens)| *tokens > 1)
            .collect()
    }

    /// True iff every input place of `transition` holds a token.
    ///
    /// Counts above one are treated like one. Unknown transitions are never
    /// enabled, and nothing is enabled under a marking of the wrong length.
    pub fn is_enabled(&self, transition: TransitionId, marking: &Marking) -> bool {
        if marking.len() != self.places_len() {
            return false;
        }
        match self.pre.get(transition) {
            Some(pre) => pre
                .iter()
                .all(|&place| marking.get(place).is_some_and(|tokens| tokens > 0)),
            None => false,
        }
    }

    /// Moves one token out of each input place and into each output place.
    ///
    /// Does not require `transition` to be enabled first; it fails with
    /// [`FireError::NegativeToken`] instead of clamping when an input place is empty.
    pub fn fire(&self, transition: TransitionId, marking: &Marking) -> Result<Marking, FireError> {
        let (Some(pre), Some(post)) = (self.pre.get(transition), self.post.get(transition)) else {
            return Err(FireError::OutOfBounds(transition));
        };
        self.check_marking(marking)?;

        let mut next = marking.clone();
        for &place in pre {
            let tokens = next.tokens_mut(place);
            *tokens = tokens
                .checked_sub(1)
                .ok_or(FireError::NegativeToken { transition, place })?;
        }
        for &place in post {
            let tokens = next.tokens_mut(place);
            *tokens = tokens
                .checked_add(1)
                .ok_or(FireError::Overflow { transition, place })?;
        }
        Ok(next)
    }

    /// Enabled transitions in ascending index order.
    pub fn enabled_transitions(&self, marking: &Marking) -> Vec<TransitionId> {
        self.transitions
            .indices()
            .filter(|&transition| self.is_enabled(transition, marking))
            .collect()
    }

    /// One-step successors of `marking`, ordered by transition index.
    pub fn successors(&self, marking: &Marking) -> Result<Vec<(TransitionId, Marking)>, FireError> {
        self.enabled_transitions(marking)
            .into_iter()
            .map(|transition| Ok((transition, self.fire(transition, marking)?)))
            .collect()
    }

    /// Same as [`Net::successors`], firing the enabled transitions on the rayon pool.
    pub fn par_successors(
        &self,
        marking: &Marking,
    ) -> Result<Vec<(TransitionId, Marking)>, FireError> {
        self.enabled_transitions(marking)
            .into_par_iter()
            .map(|transition| Ok((transition, self.fire(transition, marking)?)))
            .collect()
    }

    /// Snapshot of the ids, the place index map and `marking` for a renderer.
    pub fn snapshot(&self, marking: &Marking) -> Result<NetSnapshot, FireError> {
        self.check_marking(marking)?;
        Ok(NetSnapshot {
            places: self.places.iter().map(|p| p.id.clone()).collect(),
            transitions: self.transitions.iter().map(|t| t.id.clone()).collect(),
            place_index: self
                .place_index
                .iter()
                .map(|(id, place)| (id.clone(), place.index()))
                .collect(),
            marking: marking.as_slice().to_vec(),
        })
    }

    fn check_marking(&self, marking: &Marking) -> Result<(), FireError> {
        if marking.len() != self.places_len() {
            return Err(FireError::MarkingLength {
                expected: self.places_len(),
                actual: marking.len(),
            });
        }
        Ok(())
    }

    /// Finds isolated nodes, always-enabled transitions and places that can never gain a token.
    pub fn diagnose(&self) -> DiagnosticReport {
        let mut has_input: IndexVec<PlaceId, bool> = IndexVec::from_fn(self.places_len(), |_| false);
        let mut has_output = has_input.clone();
        for transition in self.transitions.indices() {
            for &place in self.pre(transition) {
                has_output[place] = true;
            }
            for &place in self.post(transition) {
                has_input[place] = true;
            }
        }

        let mut report = DiagnosticReport {
            total_places: self.places_len(),
            total_transitions: self.transitions_len(),
            ..DiagnosticReport::default()
        };

        for (place_id, place) in self.places.iter_enumerated() {
            if !has_input[place_id] && !has_output[place_id] {
                report.isolated_places.push((place_id, place.id.clone()));
            } else if !has_input[place_id] && place.initial_marking == 0 {
                report.warnings.push(format!(
                    "place '{}' (index {}) has no input arc and starts empty; it never holds a token",
                    place.id,
                    place_id.index()
                ));
            }
        }

        for (trans_id, trans) in self.transitions.iter_enumerated() {
            match (self.pre(trans_id).is_empty(), self.post(trans_id).is_empty()) {
                (true, true) => report.isolated_transitions.push((trans_id, trans.id.clone())),
                (true, false) => report.warnings.push(format!(
                    "transition '{}' (index {}) has an empty pre-set and is always enabled",
                    trans.id,
                    trans_id.index()
                )),
                _ => {}
            }
        }

        report
    }

    pub fn log_diagnostics(&self) {
        let report = self.diagnose();

        if !report.has_issues() {
            info!("net connectivity check passed, no isolated nodes");
            return;
        }

        warn!(
            "net diagnostics: {} places, {} transitions",
            report.total_places, report.total_transitions
        );
        if !report.isolated_places.is_empty() {
            warn!("{} isolated places:", report.isolated_places.len());
            for (id, name) in &report.isolated_places {
                warn!("  - [{}] {}", id.index(), name);
            }
        }
        if !report.isolated_transitions.is_empty() {
            warn!("{} isolated transitions:", report.isolated_transitions.len());
            for (id, name) in &report.isolated_transitions {
                warn!("  - [{}] {}", id.index(), name);
            }
        }
        for warning in &report.warnings {
            warn!("  - {}", warning);
        }
    }
}
