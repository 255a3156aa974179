//! Healthy people with a long post-confirmation exposure to a sick person

use super::rows::InformList;
use crate::error::TraceResult;
use crate::graph::{GraphStore, NodeId};
use crate::model::Person;
use crate::temporal::{exceeds_threshold, overlap_duration};
use crate::traversal::{co_presences, ContactGraph};
use chrono::Duration;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

/// One qualifying sick/healthy encounter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposure {
    pub sick: NodeId,
    pub sick_name: String,
    pub healthy: NodeId,
    pub healthy_name: String,
    pub place: NodeId,
    pub overlap: Duration,
}

/// Every exposure of a healthy person to a sick person lasting at least
/// `threshold`
///
/// The sick visit must start strictly after confirmation and the healthy
/// visit must still be running when the sick visit starts. Encounters are
/// reported once per pair of visits, in traversal order.
pub fn exposures(graph: &ContactGraph<'_>, threshold: Duration) -> Vec<Exposure> {
    co_presences(graph, Person::is_sick, |_| true, Person::is_healthy)
        .into_iter()
        .filter_map(|hit| {
            let sick_visit = hit.anchor_visit;
            let healthy_visit = hit.counterpart_visit;
            if !hit.anchor.confirmed_before(sick_visit.start()) {
                return None;
            }
            if healthy_visit.end() <= sick_visit.start() {
                return None;
            }
            let overlap = overlap_duration(
                sick_visit.start(),
                sick_visit.end(),
                healthy_visit.start(),
                healthy_visit.end(),
            );
            exceeds_threshold(overlap, threshold).then(|| Exposure {
                sick: hit.anchor.id,
                sick_name: hit.anchor.name.clone(),
                healthy: hit.counterpart.id,
                healthy_name: hit.counterpart.name.clone(),
                place: hit.place.id,
                overlap,
            })
        })
        .collect()
}

/// Healthy people each sick person should warn
///
/// Sick people are listed by name; within a list, names keep first-seen order.
pub fn people_to_inform(store: &GraphStore, threshold: Duration) -> TraceResult<Vec<InformList>> {
    super::check_threshold(threshold)?;
    let graph = ContactGraph::new(store);

    let mut groups: BTreeMap<String, (FxHashSet<NodeId>, Vec<String>)> = BTreeMap::new();
    for exposure in exposures(&graph, threshold) {
        let (seen, names) = groups.entry(exposure.sick_name).or_default();
        if seen.insert(exposure.healthy) {
            names.push(exposure.healthy_name);
        }
    }

    Ok(groups
        .into_iter()
        .map(|(sick_name, (_, people_to_inform))| InformList {
            sick_name,
            people_to_inform,
        })
        .collect())
}
