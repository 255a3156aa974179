//! Whole-store lookups: labels, the busiest sick site, sick-by-name

use super::rows::{LabelRow, SickName, SickSite};
use crate::error::{TraceError, TraceResult};
use crate::graph::GraphStore;
use crate::traversal::ContactGraph;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

/// Distinct labels carried by at least one node, ascending
pub fn list_labels(store: &GraphStore) -> Vec<LabelRow> {
    store
        .labels()
        .into_iter()
        .map(|label| LabelRow {
            label: label.as_str().to_string(),
        })
        .collect()
}

/// Place type with the most distinct sick visitors
///
/// Visits count at any time, before or after confirmation. Ties go to the
/// place whose name sorts first. Fails with `NotFound` when no place has a
/// sick visitor.
pub fn top_sick_site(store: &GraphStore) -> TraceResult<SickSite> {
    let graph = ContactGraph::new(store);

    let mut best: Option<SickSite> = None;
    for place in graph.places() {
        let sick_visitors = graph
            .visits_to(place.id)
            .filter(|v| graph.person(v.person).is_some_and(|p| p.is_sick()))
            .map(|v| v.person)
            .collect::<FxHashSet<_>>()
            .len();
        if sick_visitors == 0 {
            continue;
        }

        let better = match &best {
            None => true,
            Some(current) => match sick_visitors.cmp(&current.nb_of_sick_visits) {
                Ordering::Greater => true,
                Ordering::Equal => place.name < current.place_name,
                Ordering::Less => false,
            },
        };
        if better {
            best = Some(SickSite {
                place_name: place.name.clone(),
                place_type: place.kind.clone(),
                nb_of_sick_visits: sick_visitors,
            });
        }
    }

    best.ok_or_else(|| TraceError::NotFound("no place has a sick visitor".to_string()))
}

/// The sick people among `names`, in input order without repeats
///
/// Names that match no person are skipped.
pub fn sick_from(store: &GraphStore, names: &[String]) -> TraceResult<Vec<SickName>> {
    for name in names {
        super::check_name(name)?;
    }
    let graph = ContactGraph::new(store);

    let mut seen = FxHashSet::default();
    Ok(names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .filter(|name| graph.person_by_name(name).is_some_and(|p| p.is_sick()))
        .map(|name| SickName {
            sick_name: name.clone(),
        })
        .collect())
}
