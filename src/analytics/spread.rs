//! Post-confirmation behaviour of sick people

use super::rows::{CarelessPerson, SickName, SpreadCount};
use crate::graph::{GraphStore, NodeId};
use crate::model::Person;
use crate::traversal::{co_presences, ContactGraph};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

/// Sick people and the healthy people they may have met
///
/// Both visits to the shared place must start strictly after the sick
/// person's confirmation. Keyed by sick name, so iteration is name-ordered.
fn spread_targets<'g>(graph: &'g ContactGraph<'_>) -> BTreeMap<&'g str, FxHashSet<NodeId>> {
    let mut targets: BTreeMap<&str, FxHashSet<NodeId>> = BTreeMap::new();

    let hits = co_presences(graph, Person::is_sick, |_| true, Person::is_healthy);
    for hit in hits {
        let sick = hit.anchor;
        if sick.confirmed_before(hit.anchor_visit.start())
            && sick.confirmed_before(hit.counterpart_visit.start())
        {
            targets
                .entry(sick.name.as_str())
                .or_default()
                .insert(hit.counterpart.id);
        }
    }

    targets
}

/// Sick people who went somewhere a healthy person also went after the
/// sick person was confirmed
pub fn possible_spreaders(store: &GraphStore) -> Vec<SickName> {
    let graph = ContactGraph::new(store);
    spread_targets(&graph)
        .into_keys()
        .map(|name| SickName {
            sick_name: name.to_string(),
        })
        .collect()
}

/// Like [`possible_spreaders`], with the number of distinct healthy people
pub fn possible_spread_counts(store: &GraphStore) -> Vec<SpreadCount> {
    let graph = ContactGraph::new(store);
    spread_targets(&graph)
        .into_iter()
        .map(|(name, healthy)| SpreadCount {
            sick_name: name.to_string(),
            nb_healthy: healthy.len(),
        })
        .collect()
}

/// Distinct places each sick person visited after confirmation
fn post_confirmation_places(graph: &ContactGraph<'_>, person: &Person) -> usize {
    graph
        .visits_of(person.id)
        .filter(|v| person.confirmed_before(v.start()))
        .map(|v| v.place)
        .collect::<FxHashSet<_>>()
        .len()
}

/// Sick people who visited more than `min_places` distinct places after
/// confirmation, fewest places first
pub fn careless_people(store: &GraphStore, min_places: usize) -> Vec<CarelessPerson> {
    let graph = ContactGraph::new(store);

    let mut rows: Vec<CarelessPerson> = graph
        .people()
        .filter(|p| p.is_sick())
        .filter_map(|p| {
            let nb_places = post_confirmation_places(&graph, p);
            (nb_places > min_places).then(|| CarelessPerson {
                sick_name: p.name.clone(),
                nb_places,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.nb_places
            .cmp(&b.nb_places)
            .then_with(|| a.sick_name.cmp(&b.sick_name))
    });
    rows
}

/// Sick people with no visit at all after confirmation
///
/// A sick person without a confirmation time never has a post-confirmation
/// visit and is therefore careful.
pub fn socially_careful(store: &GraphStore) -> Vec<SickName> {
    let graph = ContactGraph::new(store);

    let mut names: Vec<&str> = graph
        .people()
        .filter(|p| p.is_sick())
        .filter(|p| !graph.visits_of(p.id).any(|v| p.confirmed_before(v.start())))
        .map(|p| p.name.as_str())
        .collect();
    names.sort_unstable();

    names
        .into_iter()
        .map(|name| SickName {
            sick_name: name.to_string(),
        })
        .collect()
}
